//! Small numeric helpers: population moments and the standard normal CDF.

use std::f64::consts::FRAC_1_SQRT_2;

/// Mean and population standard deviation (divisor `n`) of a sample.
///
/// Uses Welford's online update so a long baseline does not lose precision
/// to a large running sum. Returns `None` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let n = (i + 1) as f64;
        let delta = v - mean;
        mean += delta / n;
        m2 += delta * (v - mean);
    }

    let variance = (m2 / values.len() as f64).max(0.0);
    Some((mean, variance.sqrt()))
}

/// Chebyshev fit of `erfc` on `z >= 0` with fractional error below 1.2e-7
/// (Numerical Recipes `erfcc`).
fn erfc_fit(z: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    t * poly.exp()
}

/// Complementary error function.
///
/// The raw fit evaluates to `1 + 3e-8` at zero; it is rescaled so that
/// `erfc(0) == 1` exactly, which keeps the reflected branch continuous and
/// the function monotone across the origin.
pub fn erfc(x: f64) -> f64 {
    let upper = erfc_fit(x.abs()) / erfc_fit(0.0);
    if x >= 0.0 {
        upper
    } else {
        2.0 - upper
    }
}

/// Standard normal cumulative distribution function `Φ(z)`.
///
/// Always in `[0, 1]`; `±∞` map to the bounds and `NaN` propagates.
pub fn standard_normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    (0.5 * erfc(-z * FRAC_1_SQRT_2)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_of_known_sample() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn moments_of_single_value_have_zero_spread() {
        let (mean, std) = mean_and_std(&[3.25]).unwrap();
        assert!((mean - 3.25).abs() < f64::EPSILON);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn moments_of_empty_sample() {
        assert!(mean_and_std(&[]).is_none());
    }

    #[test]
    fn cdf_reference_values() {
        let cases = [
            (0.0, 0.5),
            (1.0, 0.841_344_746_068_542_9),
            (-1.0, 0.158_655_253_931_457_05),
            (1.959_963_984_540_054, 0.975),
            (2.326_347_874_040_841, 0.99),
            (-3.0, 0.001_349_898_031_630_094_6),
        ];
        for (z, expected) in cases {
            let got = standard_normal_cdf(z);
            assert!(
                (got - expected).abs() < 1e-7,
                "Φ({z}) = {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn cdf_tails_and_bounds() {
        assert_eq!(standard_normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(standard_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert!(standard_normal_cdf(40.0) <= 1.0);
        assert!(standard_normal_cdf(-40.0) >= 0.0);
        assert!(standard_normal_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn cdf_is_symmetric() {
        for z in [0.1, 0.5, 1.3, 2.7, 4.0] {
            let sum = standard_normal_cdf(z) + standard_normal_cdf(-z);
            assert!((sum - 1.0).abs() < 1e-7, "z = {z}");
        }
    }

    #[test]
    fn erfc_is_continuous_at_zero() {
        assert_eq!(erfc(0.0), 1.0);
        assert!(erfc(-1e-12) > erfc(0.0));
        assert!(erfc(1e-12) < erfc(0.0));
        assert_eq!(standard_normal_cdf(0.0), 0.5);
    }

    #[test]
    fn cdf_is_non_decreasing_on_a_grid() {
        let mut prev = 0.0;
        for i in -800..=800 {
            let z = f64::from(i) / 100.0;
            let p = standard_normal_cdf(z);
            assert!(p >= prev, "Φ decreased at z = {z}");
            prev = p;
        }
    }
}
