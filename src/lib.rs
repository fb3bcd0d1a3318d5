//! # Statistical core of a small-variant caller
//!
//! Turns per-base and per-indel observation counts at a genomic position into
//! calibrated quality scores and variant calls, and maintains the error-rate
//! models that calibration depends on.
//!
//! ## Components
//!
//! 1. **Indel error-rate model** ([`calibration`]): indel error probabilities
//!    as a function of repeat pattern size and repeat count, from a built-in
//!    preset or a JSON model file
//! 2. **Observation aggregator** ([`error_analysis`]): compressed,
//!    strand-canonical basecall observation patterns, merged across shards
//!    and exported for error model fitting
//! 3. **Continuous-frequency caller** ([`calling`]): Poisson quality scores,
//!    strand bias and allele emission for SNV and indel loci
//!
//! ## Usage Example
//!
//! ```
//! use smallvar::calibration::{IndelErrorModel, RateSource};
//! use smallvar::types::{IndelKey, IndelRepeatContext};
//!
//! let model = IndelErrorModel::new("adaptiveDefault", None)?;
//! let probs = model.indel_error_probs(
//!     &IndelKey::deletion(1_000, 1),
//!     &IndelRepeatContext::new(1, 8, 7),
//!     RateSource::Report,
//! );
//! assert!(probs.ref_to_indel > 0.0);
//! # Ok::<(), smallvar::calibration::ModelError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod calibration; // Indel error-rate tables
pub mod calling; // Continuous-frequency calling
pub mod error_analysis; // Basecall observation aggregation
pub mod types; // Shared genomic primitives

pub use calibration::{IndelErrorModel, ModelError};
pub use calling::{ContinuousCallerOptions, ContinuousVariantCaller};
pub use error_analysis::{BasecallErrorCounts, ExportError};
pub use types::{Base, BaseCall, IndelKey, IndelRepeatContext};
