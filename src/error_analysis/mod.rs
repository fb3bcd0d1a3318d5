//! Basecall error observation aggregation.
//!
//! Sites are reduced to compressed, strand-canonical observation patterns
//! counted per calibration context, so that very large observation volumes
//! can be summarised for error model fitting without keeping per-read
//! records. Accumulators are built per shard and combined with an
//! order-independent merge before export.

mod compress;
mod counts;
mod observation;
mod observation_data;

use thiserror::Error;

pub use compress::{compress_int, COUNT_COMPRESSION_BITS};
pub use counts::{BasecallErrorContext, BasecallErrorCounts, BasecallErrorData};
pub use observation::{
    BasecallErrorContextInputObservation, BasecallErrorContextObservation, BasecallQuality,
    QualityCounts, StrandBasecallCounts,
};
pub use observation_data::{
    BasecallErrorContextObservationData, ExportObservation, ExportStrandObservation,
    ObservationExportData,
};

/// Internal-consistency failures detected while exporting observations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Alt evidence uses a quality level absent from reference evidence.
    #[error("alt evidence at basecall quality {quality} has no reference quality level")]
    UnlistedQualityLevel {
        /// Offending quality level.
        quality: BasecallQuality,
    },

    /// Two distinct patterns flattened to the same export key.
    #[error("distinct observation patterns flatten to the same export key")]
    DuplicateExportKey,

    /// Failure while exporting one context.
    #[error("export failed for basecall context {context}")]
    Context {
        /// Context being exported.
        context: BasecallErrorContext,
        /// Underlying failure.
        #[source]
        source: Box<ExportError>,
    },
}
