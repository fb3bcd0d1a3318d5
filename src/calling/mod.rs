//! Continuous-frequency site and indel calling.
//!
//! Alleles are reported whenever their observed frequency clears a floor,
//! without a diploid genotype model. Each emitted allele is scored with a
//! Poisson tail quality against an assumed basecall error rate, and
//! non-reference site alleles also get a strand-bias statistic.

mod continuous;
mod locus;
mod options;
pub mod scoring;

use thiserror::Error;

pub use continuous::ContinuousVariantCaller;
pub use locus::{
    FilterSet, IndelAlleleInfo, IndelCandidate, IndelLocusInfo, IndelSampleReportInfo,
    LocusFilter, SampleInfo, SiteAlleleInfo, SiteLocusInfo,
};
pub use options::{
    ContinuousCallerOptions, DEFAULT_MAX_QSCORE, DEFAULT_MIN_HET_VF, DEFAULT_MIN_QSCORE,
    DEFAULT_NOISE_FLOOR,
};
pub use scoring::{poisson_qscore, strand_bias};

/// Invalid caller configuration.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    /// Frequency floor outside `[0, 1)`.
    #[error("minimum het variant frequency must be in [0, 1), got {0}")]
    MinHetVf(f64),

    /// Noise floor outside `[0, 1]`.
    #[error("noise floor must be in [0, 1], got {0}")]
    NoiseFloor(f64),

    /// Negative quality cap.
    #[error("maximum qscore must be non-negative, got {0}")]
    MaxQscore(i32),
}
