//! Indel error-rate models.
//!
//! Rates are a function of the repeat pattern size and repeat count at the
//! indel locus. Tables are built once (from a preset or a model file),
//! finalized so that every legal query resolves, and are read-only
//! afterwards.

mod adaptive;
mod indel_error_model;
mod model_file;
mod presets;
mod rate_set;

use std::path::PathBuf;

use thiserror::Error;

pub use adaptive::{AdaptiveIndelErrorModel, AdaptiveIndelErrorModelLogParams, LOW_REPEAT_COUNT};
pub use indel_error_model::{IndelErrorModel, IndelErrorModelPreset, IndelErrorProbs, RateSource};
pub use model_file::{IndelModelFile, MotifRecord};
pub use presets::{adaptive_default_rates, log_linear_rates};
pub use rate_set::{IndelErrorRate, IndelErrorRateSet, IndelErrorRateSetBuilder, IndelErrorRateType};

/// Configuration errors raised while building an indel error model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Preset name not recognised and no model file given.
    #[error("unrecognized indel error model name: '{name}'")]
    UnknownPreset {
        /// Name that was requested.
        name: String,
    },

    /// Model file could not be read.
    #[error("unable to read indel error model file '{path}': {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Model file is not a valid JSON model document.
    #[error("failed to parse indel error model file '{path}': {source}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },

    /// Model file parsed but carries no motif list.
    #[error("no motifs in indel error model file '{path}'")]
    MissingMotifs {
        /// Offending file.
        path: PathBuf,
    },

    /// A motif record uses a zero pattern size or repeat count.
    #[error(
        "invalid motif (repeatPatternSize={pattern_size}, repeatCount={repeat_count}): \
         both must be >= 1"
    )]
    InvalidMotif {
        /// Pattern size of the record.
        pattern_size: u32,
        /// Repeat count of the record.
        repeat_count: u32,
    },

    /// Finalizing a rate set that holds no rates.
    #[error("indel error rate set is empty")]
    EmptyRateSet,

    /// Adaptive model anchors do not span a range.
    #[error("adaptive model high repeat count {high} must exceed the low anchor {low}")]
    InvalidAnchors {
        /// Low anchor repeat count.
        low: u32,
        /// Requested high anchor repeat count.
        high: u32,
    },

    /// Adaptive model queried below its low anchor.
    #[error("repeat count {repeat_count} is below the adaptive model low anchor {low}")]
    RepeatCountBelowLowAnchor {
        /// Requested repeat count.
        repeat_count: u32,
        /// Low anchor repeat count.
        low: u32,
    },
}
