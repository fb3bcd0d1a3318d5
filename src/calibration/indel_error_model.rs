use std::path::Path;
use std::str::FromStr;

use tracing::info;

use super::{
    adaptive_default_rates, log_linear_rates, IndelErrorRateSet, IndelErrorRateType,
    IndelModelFile, ModelError,
};
use crate::types::{IndelKey, IndelKind, IndelRepeatContext};

/// Built-in report-time models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndelErrorModelPreset {
    /// Homopolymer log-linear ramp (`"logLinear"`).
    LogLinear,
    /// Non-STR baseline with adaptive homopolymer and dinucleotide ramps
    /// (`"adaptiveDefault"`).
    AdaptiveDefault,
}

impl IndelErrorModelPreset {
    /// Name used on the command line and in configuration.
    pub fn name(self) -> &'static str {
        match self {
            IndelErrorModelPreset::LogLinear => "logLinear",
            IndelErrorModelPreset::AdaptiveDefault => "adaptiveDefault",
        }
    }

    fn rates(self) -> Result<IndelErrorRateSet, ModelError> {
        match self {
            IndelErrorModelPreset::LogLinear => log_linear_rates().finalize(),
            IndelErrorModelPreset::AdaptiveDefault => adaptive_default_rates()?.finalize(),
        }
    }
}

impl FromStr for IndelErrorModelPreset {
    type Err = ModelError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "logLinear" => Ok(IndelErrorModelPreset::LogLinear),
            "adaptiveDefault" => Ok(IndelErrorModelPreset::AdaptiveDefault),
            _ => Err(ModelError::UnknownPreset {
                name: name.to_string(),
            }),
        }
    }
}

/// Which rate table a lookup should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Rates used to score called indels.
    Report,
    /// Fixed log-linear rates used to select indel candidates.
    Candidate,
}

/// Error probabilities in both directions for one indel allele.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndelErrorProbs {
    /// Probability that a reference read shows the indel.
    pub ref_to_indel: f64,
    /// Probability that an indel read shows the reference.
    pub indel_to_ref: f64,
}

/// Report and candidate indel error rates for a run.
#[derive(Debug, Clone)]
pub struct IndelErrorModel {
    report_rates: IndelErrorRateSet,
    candidate_rates: IndelErrorRateSet,
}

impl IndelErrorModel {
    /// Build from a preset name, or from `model_file` when one is given (the
    /// name is then ignored).
    pub fn new(model_name: &str, model_file: Option<&Path>) -> Result<Self, ModelError> {
        match model_file {
            Some(path) => Self::from_file(path),
            None => Self::from_preset(model_name.parse()?),
        }
    }

    /// Build with a built-in report model.
    pub fn from_preset(preset: IndelErrorModelPreset) -> Result<Self, ModelError> {
        info!(model = preset.name(), "using built-in indel error model");
        Self::with_report_rates(preset.rates()?)
    }

    /// Build with report rates read from a JSON model file.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let rates = IndelModelFile::from_path(path)?
            .into_rates(path)?
            .finalize()?;
        Self::with_report_rates(rates)
    }

    /// Build around already finalized report rates.
    pub fn with_report_rates(report_rates: IndelErrorRateSet) -> Result<Self, ModelError> {
        Ok(Self {
            report_rates,
            candidate_rates: log_linear_rates().finalize()?,
        })
    }

    /// Rate table selected by `source`.
    pub fn rates(&self, source: RateSource) -> &IndelErrorRateSet {
        match source {
            RateSource::Report => &self.report_rates,
            RateSource::Candidate => &self.candidate_rates,
        }
    }

    /// Error probabilities of the indel in its repeat context.
    ///
    /// Complex indels use the larger of the baseline (non-STR) insertion and
    /// deletion rates in both directions.
    pub fn indel_error_probs(
        &self,
        key: &IndelKey,
        context: &IndelRepeatContext,
        source: RateSource,
    ) -> IndelErrorProbs {
        let rates = self.rates(source);

        let indel_type = match key.kind {
            IndelKind::Insertion => IndelErrorRateType::Insert,
            IndelKind::Deletion => IndelErrorRateType::Delete,
            IndelKind::Complex => {
                let baseline = rates
                    .rate(1, 1, IndelErrorRateType::Insert)
                    .max(rates.rate(1, 1, IndelErrorRateType::Delete));
                return IndelErrorProbs {
                    ref_to_indel: baseline,
                    indel_to_ref: baseline,
                };
            }
        };

        let pattern_size = context.repeat_unit_length.max(1);
        let ref_repeat_count = context.ref_repeat_count.max(1);
        let indel_repeat_count = context.indel_repeat_count.max(1);

        IndelErrorProbs {
            ref_to_indel: rates.rate(pattern_size, ref_repeat_count, indel_type),
            indel_to_ref: rates.rate(pattern_size, indel_repeat_count, indel_type.opposite()),
        }
    }
}
