use super::OptionsError;

/// Default minimum allele frequency for an allele to be called.
pub const DEFAULT_MIN_HET_VF: f64 = 0.01;
/// Default basecall quality assumed when scoring calls.
pub const DEFAULT_MIN_QSCORE: u32 = 17;
/// Default noise floor.
pub const DEFAULT_NOISE_FLOOR: f64 = 0.005;
/// Default cap on genotype quality.
pub const DEFAULT_MAX_QSCORE: i32 = 40;

/// Configuration of the continuous-frequency caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousCallerOptions {
    /// Variant frequency an allele must exceed to be called.
    pub min_het_vf: f64,
    /// Basecall quality used as the error-rate estimate when scoring.
    pub min_qscore: u32,
    /// Expected noise frequency (not used by the strand-bias statistic).
    pub noise_floor: f64,
    /// Cap on genotype quality.
    pub max_qscore: i32,
    /// Locus quality below which the locus is filtered.
    pub min_gqx: Option<i32>,
}

impl Default for ContinuousCallerOptions {
    fn default() -> Self {
        Self {
            min_het_vf: DEFAULT_MIN_HET_VF,
            min_qscore: DEFAULT_MIN_QSCORE,
            noise_floor: DEFAULT_NOISE_FLOOR,
            max_qscore: DEFAULT_MAX_QSCORE,
            min_gqx: None,
        }
    }
}

impl ContinuousCallerOptions {
    /// Set the minimum variant frequency.
    pub fn with_min_het_vf(mut self, min_het_vf: f64) -> Self {
        self.min_het_vf = min_het_vf;
        self
    }

    /// Set the basecall quality used for scoring.
    pub fn with_min_qscore(mut self, min_qscore: u32) -> Self {
        self.min_qscore = min_qscore;
        self
    }

    /// Set the noise floor.
    pub fn with_noise_floor(mut self, noise_floor: f64) -> Self {
        self.noise_floor = noise_floor;
        self
    }

    /// Set the genotype quality cap.
    pub fn with_max_qscore(mut self, max_qscore: i32) -> Self {
        self.max_qscore = max_qscore;
        self
    }

    /// Enable the low-quality locus filter.
    pub fn with_min_gqx(mut self, min_gqx: i32) -> Self {
        self.min_gqx = Some(min_gqx);
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(0.0..1.0).contains(&self.min_het_vf) {
            return Err(OptionsError::MinHetVf(self.min_het_vf));
        }
        if !(0.0..=1.0).contains(&self.noise_floor) {
            return Err(OptionsError::NoiseFloor(self.noise_floor));
        }
        if self.max_qscore < 0 {
            return Err(OptionsError::MaxQscore(self.max_qscore));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ContinuousCallerOptions::default().validate().is_ok());
    }

    #[test]
    fn builder_overrides_defaults() {
        let options = ContinuousCallerOptions::default()
            .with_min_het_vf(0.05)
            .with_min_qscore(20)
            .with_max_qscore(60)
            .with_min_gqx(15);
        assert_eq!(options.min_het_vf, 0.05);
        assert_eq!(options.min_qscore, 20);
        assert_eq!(options.max_qscore, 60);
        assert_eq!(options.min_gqx, Some(15));
        assert_eq!(options.noise_floor, DEFAULT_NOISE_FLOOR);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let base = ContinuousCallerOptions::default();
        assert!(matches!(
            base.clone().with_min_het_vf(1.0).validate(),
            Err(OptionsError::MinHetVf(_))
        ));
        assert!(matches!(
            base.clone().with_noise_floor(-0.1).validate(),
            Err(OptionsError::NoiseFloor(_))
        ));
        assert!(matches!(
            base.with_max_qscore(-1).validate(),
            Err(OptionsError::MaxQscore(-1))
        ));
    }
}
