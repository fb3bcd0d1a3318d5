use super::ModelError;

/// Repeat count of the low interpolation anchor.
pub const LOW_REPEAT_COUNT: u32 = 2;

/// Log-space rates anchoring one end of an adaptive model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdaptiveIndelErrorModelLogParams {
    /// Natural log of the indel error rate.
    pub log_error_rate: f64,
    /// Natural log of the noisy-locus rate.
    pub log_noisy_locus_rate: f64,
}

impl AdaptiveIndelErrorModelLogParams {
    /// Anchor with an error rate only (noisy-locus log rate left at zero).
    pub fn from_error_rate(error_rate: f64) -> Self {
        Self {
            log_error_rate: error_rate.ln(),
            log_noisy_locus_rate: 0.0,
        }
    }
}

/// Error rates for one repeat pattern size, interpolated linearly in log
/// space between [`LOW_REPEAT_COUNT`] and `high_repeat_count`, and constant
/// from `high_repeat_count` onward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveIndelErrorModel {
    repeat_pattern_size: u32,
    high_repeat_count: u32,
    low_log_params: AdaptiveIndelErrorModelLogParams,
    high_log_params: AdaptiveIndelErrorModelLogParams,
}

impl AdaptiveIndelErrorModel {
    /// Build a model; the high anchor must lie above [`LOW_REPEAT_COUNT`].
    pub fn new(
        repeat_pattern_size: u32,
        high_repeat_count: u32,
        low_log_params: AdaptiveIndelErrorModelLogParams,
        high_log_params: AdaptiveIndelErrorModelLogParams,
    ) -> Result<Self, ModelError> {
        if high_repeat_count <= LOW_REPEAT_COUNT {
            return Err(ModelError::InvalidAnchors {
                low: LOW_REPEAT_COUNT,
                high: high_repeat_count,
            });
        }
        Ok(Self {
            repeat_pattern_size,
            high_repeat_count,
            low_log_params,
            high_log_params,
        })
    }

    /// Pattern size this model describes.
    pub fn repeat_pattern_size(&self) -> u32 {
        self.repeat_pattern_size
    }

    /// Repeat count from which the high anchor applies.
    pub fn high_repeat_count(&self) -> u32 {
        self.high_repeat_count
    }

    /// Indel error rate at `repeat_count` (must be at least 2).
    pub fn error_rate(&self, repeat_count: u32) -> Result<f64, ModelError> {
        self.interpolate(repeat_count, |params| params.log_error_rate)
    }

    /// Noisy-locus rate at `repeat_count` (must be at least 2).
    pub fn noisy_locus_rate(&self, repeat_count: u32) -> Result<f64, ModelError> {
        self.interpolate(repeat_count, |params| params.log_noisy_locus_rate)
    }

    fn interpolate(
        &self,
        repeat_count: u32,
        select: impl Fn(&AdaptiveIndelErrorModelLogParams) -> f64,
    ) -> Result<f64, ModelError> {
        if repeat_count < LOW_REPEAT_COUNT {
            return Err(ModelError::RepeatCountBelowLowAnchor {
                repeat_count,
                low: LOW_REPEAT_COUNT,
            });
        }
        let high = select(&self.high_log_params);
        if repeat_count >= self.high_repeat_count {
            return Ok(high.exp());
        }
        Ok(linear_fit(
            f64::from(repeat_count),
            f64::from(LOW_REPEAT_COUNT),
            select(&self.low_log_params),
            f64::from(self.high_repeat_count),
            high,
        )
        .exp())
    }
}

/// Value at `x` of the line through `(x1, y1)` and `(x2, y2)`.
fn linear_fit(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    debug_assert!(x1 != x2);
    ((y2 - y1) * x + (x2 * y1 - x1 * y2)) / (x2 - x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> AdaptiveIndelErrorModel {
        AdaptiveIndelErrorModel::new(
            1,
            16,
            AdaptiveIndelErrorModelLogParams::from_error_rate(4.9e-3),
            AdaptiveIndelErrorModelLogParams::from_error_rate(4.5e-2),
        )
        .unwrap()
    }

    #[test]
    fn high_anchor_is_exact() {
        let model = model();
        let expected = (4.5e-2f64).ln().exp();
        assert_eq!(model.error_rate(16).unwrap(), expected);
        assert_eq!(model.error_rate(40).unwrap(), expected);
    }

    #[test]
    fn low_anchor_reproduces_low_rate() {
        let rate = model().error_rate(LOW_REPEAT_COUNT).unwrap();
        assert!((rate - 4.9e-3).abs() < 1e-12);
    }

    #[test]
    fn interpolation_is_geometric_midpoint() {
        let model = model();
        let mid = model.error_rate(9).unwrap();
        let expected = (4.9e-3f64 * 4.5e-2).sqrt();
        assert!((mid - expected).abs() < 1e-12);
    }

    #[test]
    fn repeat_count_below_low_anchor_is_rejected() {
        let err = model().error_rate(1).unwrap_err();
        assert!(matches!(
            err,
            ModelError::RepeatCountBelowLowAnchor { repeat_count: 1, low: 2 }
        ));
    }

    #[test]
    fn degenerate_anchors_are_rejected() {
        let params = AdaptiveIndelErrorModelLogParams::default();
        assert!(AdaptiveIndelErrorModel::new(1, 2, params, params).is_err());
    }

    #[test]
    fn noisy_locus_rate_interpolates_independently() {
        let low = AdaptiveIndelErrorModelLogParams {
            log_error_rate: (1e-3f64).ln(),
            log_noisy_locus_rate: (1e-2f64).ln(),
        };
        let high = AdaptiveIndelErrorModelLogParams {
            log_error_rate: (1e-2f64).ln(),
            log_noisy_locus_rate: (1e-1f64).ln(),
        };
        let model = AdaptiveIndelErrorModel::new(2, 4, low, high).unwrap();
        let noisy = model.noisy_locus_rate(3).unwrap();
        assert!((noisy - (1e-3f64).sqrt()).abs() < 1e-12);
    }
}
