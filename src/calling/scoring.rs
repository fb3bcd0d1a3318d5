//! Quality scoring and strand-bias statistics for continuous-frequency calls.

use statrs::distribution::{Binomial, Discrete};
use statrs::function::gamma::gamma_lr;

/// Error probability of a phred-scaled quality.
pub fn qphred_to_error_prob(qphred: u32) -> f64 {
    10f64.powf(-f64::from(qphred) / 10.0)
}

/// Nearest integer phred score of an error probability in `(0, 1]`.
pub fn error_prob_to_qphred(prob: f64) -> i32 {
    (-10.0 * prob.log10()).round() as i32
}

/// `count / total`, or 0 when `total` is 0.
pub fn safe_frac(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(total)
    }
}

/// Probability of seeing at least `observed_call_count` error calls in
/// `coverage` reads when every read errs at the rate implied by
/// `estimated_base_call_quality`.
///
/// The count is Poisson with mean `coverage * error_rate`, so the upper tail
/// equals the regularized lower incomplete gamma `P(count, mean)`.
pub fn poisson_tail_prob(
    observed_call_count: u32,
    coverage: u32,
    estimated_base_call_quality: u32,
) -> f64 {
    if observed_call_count == 0 {
        return 1.0;
    }
    let mean = f64::from(coverage) * qphred_to_error_prob(estimated_base_call_quality);
    if mean <= 0.0 {
        return 0.0;
    }
    gamma_lr(f64::from(observed_call_count), mean)
}

/// Phred-scaled confidence that `call_count` observations out of `coverage`
/// are not all basecall errors, capped at `max_qscore`.
pub fn poisson_qscore(
    call_count: u32,
    coverage: u32,
    estimated_base_call_quality: u32,
    max_qscore: i32,
) -> i32 {
    let tail_prob = poisson_tail_prob(call_count, coverage, estimated_base_call_quality);
    if tail_prob <= 0.0 {
        return max_qscore;
    }
    max_qscore.min(error_prob_to_qphred(tail_prob))
}

/// Binomial log-likelihood of `observed` successes out of `coverage`.
///
/// A zero count has likelihood 0 by convention, so its log-likelihood is
/// negative infinity.
fn log_likelihood(coverage: u64, observed: u64, expected_frequency: f64) -> f64 {
    if observed == 0 {
        return f64::NEG_INFINITY;
    }
    match Binomial::new(expected_frequency, coverage) {
        Ok(binomial) => binomial.ln_pmf(observed),
        Err(_) => f64::NEG_INFINITY,
    }
}

/// Strand-bias statistic of an allele.
///
/// All likelihoods use the variant frequency pooled over both strands. The
/// result is the better single-strand log-likelihood minus the combined
/// log-likelihood. A strand without alt reads never wins the maximum, and
/// an allele without alt reads on either strand scores 0.
///
/// `_noise` is accepted for interface compatibility and currently unused.
pub fn strand_bias(
    fwd_alt: u32,
    rev_alt: u32,
    fwd_other: u32,
    rev_other: u32,
    _noise: f64,
) -> f64 {
    let (fwd_alt, rev_alt) = (u64::from(fwd_alt), u64::from(rev_alt));
    let (fwd_other, rev_other) = (u64::from(fwd_other), u64::from(rev_other));

    let alt = fwd_alt + rev_alt;
    if alt == 0 {
        return 0.0;
    }
    let total = alt + fwd_other + rev_other;
    let expected_vf = alt as f64 / total as f64;

    let fwd = log_likelihood(fwd_alt + fwd_other, fwd_alt, expected_vf);
    let rev = log_likelihood(rev_alt + rev_other, rev_alt, expected_vf);
    let both = log_likelihood(total, alt, expected_vf);
    fwd.max(rev) - both
}
