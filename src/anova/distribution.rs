// F distribution tail probabilities and quantiles using statrs
//
// The p-value is the upper tail P(F ≥ f). The critical value is the
// (1 - alpha) quantile, found by bisection on the CDF so that precision does
// not depend on the quantile routine of a particular statrs release.

use crate::error::{AnovaError, Result};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

const QUANTILE_TOLERANCE: f64 = 1e-12;
const MAX_BISECTION_STEPS: usize = 200;

fn fisher_snedecor(df_between: usize, df_within: usize) -> Result<FisherSnedecor> {
    if df_between == 0 || df_within == 0 {
        return Err(AnovaError::insufficient(format!(
            "F distribution needs positive degrees of freedom, got ({}, {})",
            df_between, df_within
        )));
    }

    FisherSnedecor::new(df_between as f64, df_within as f64)
        .map_err(|e| AnovaError::Distribution(e.to_string()))
}

/// Upper-tail p-value P(F ≥ f_statistic)
pub fn f_p_value(f_statistic: f64, df_between: usize, df_within: usize) -> Result<f64> {
    let dist = fisher_snedecor(df_between, df_within)?;

    if f_statistic.is_nan() {
        return Err(AnovaError::Distribution(
            "F statistic is NaN".to_string(),
        ));
    }
    if f_statistic <= 0.0 {
        return Ok(1.0);
    }
    if f_statistic.is_infinite() {
        return Ok(0.0);
    }

    Ok((1.0 - dist.cdf(f_statistic)).clamp(0.0, 1.0))
}

/// Critical value F(1 - alpha; df_between, df_within)
pub fn f_critical_value(alpha: f64, df_between: usize, df_within: usize) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AnovaError::InvalidAlpha(alpha));
    }

    let dist = fisher_snedecor(df_between, df_within)?;
    let target = 1.0 - alpha;

    // Bracket the quantile, then bisect
    let mut low = 0.0_f64;
    let mut high = 1.0_f64;
    while dist.cdf(high) < target {
        low = high;
        high *= 2.0;
        if !high.is_finite() {
            return Err(AnovaError::Distribution(format!(
                "could not bracket F quantile for alpha={}",
                alpha
            )));
        }
    }

    for _ in 0..MAX_BISECTION_STEPS {
        let mid = 0.5 * (low + high);
        if dist.cdf(mid) < target {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < QUANTILE_TOLERANCE * high.max(1.0) {
            break;
        }
    }

    Ok(0.5 * (low + high))
}
