//! Built-in indel error rate presets.

use super::{
    AdaptiveIndelErrorModel, AdaptiveIndelErrorModelLogParams, IndelErrorRateSetBuilder,
    ModelError, LOW_REPEAT_COUNT,
};

const LOG_LINEAR_LOW_ERROR_RATE: f64 = 5e-5;
const LOG_LINEAR_HIGH_ERROR_RATE: f64 = 3e-4;
/// Zero-indexed end of the ramp: the high rate is reached at repeat count 16.
const LOG_LINEAR_SWITCH_POINT: u32 = 15;

const ADAPTIVE_NON_STR_RATE: f64 = 8e-3;

struct AdaptivePreset {
    pattern_size: u32,
    low_error_rate: f64,
    high_error_rate: f64,
    switch_point: u32,
}

const ADAPTIVE_PRESETS: [AdaptivePreset; 2] = [
    AdaptivePreset {
        pattern_size: 1,
        low_error_rate: 4.9e-3,
        high_error_rate: 4.5e-2,
        switch_point: 16,
    },
    AdaptivePreset {
        pattern_size: 2,
        low_error_rate: 1.0e-2,
        high_error_rate: 1.8e-2,
        switch_point: 9,
    },
];

/// Homopolymer-only log-linear ramp from 5e-5 (count 1) to 3e-4 (count 16).
///
/// Also the fixed candidate-generation rate set.
pub fn log_linear_rates() -> IndelErrorRateSetBuilder {
    let log_low = LOG_LINEAR_LOW_ERROR_RATE.ln();
    let log_high = LOG_LINEAR_HIGH_ERROR_RATE.ln();

    let mut rates = IndelErrorRateSetBuilder::new();
    for repeat_count in 1..=(LOG_LINEAR_SWITCH_POINT + 1) {
        let high_frac = f64::from((repeat_count - 1).min(LOG_LINEAR_SWITCH_POINT))
            / f64::from(LOG_LINEAR_SWITCH_POINT);
        let error_rate = ((1.0 - high_frac) * log_low + high_frac * log_high).exp();
        rates.add_rate(1, repeat_count, error_rate, error_rate, 0.0);
    }
    rates
}

/// Non-STR baseline plus adaptive ramps for homopolymers (counts 2-16) and
/// dinucleotide repeats (counts 2-9).
pub fn adaptive_default_rates() -> Result<IndelErrorRateSetBuilder, ModelError> {
    let mut rates = IndelErrorRateSetBuilder::new();
    for preset in &ADAPTIVE_PRESETS {
        let model = AdaptiveIndelErrorModel::new(
            preset.pattern_size,
            preset.switch_point,
            AdaptiveIndelErrorModelLogParams::from_error_rate(preset.low_error_rate),
            AdaptiveIndelErrorModelLogParams::from_error_rate(preset.high_error_rate),
        )?;

        rates.add_rate(
            preset.pattern_size,
            1,
            ADAPTIVE_NON_STR_RATE,
            ADAPTIVE_NON_STR_RATE,
            0.0,
        );
        for repeat_count in LOW_REPEAT_COUNT..=preset.switch_point {
            let error_rate = model.error_rate(repeat_count)?;
            rates.add_rate(preset.pattern_size, repeat_count, error_rate, error_rate, 0.0);
        }
    }
    Ok(rates)
}
