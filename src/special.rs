//! Standard normal distribution functions.
//!
//! Provides the cumulative distribution function `Φ` and its inverse
//! (quantile function) used by the risk model. Pure Rust, no allocation.
//!
//! # Accuracy
//!
//! - `standard_normal_cdf`: Hart (1968) rational approximation as
//!   restated by West, absolute error below `1e-14` over the real line.
//! - `inverse_normal_cdf`: Acklam's rational approximation (relative
//!   error `1.15e-9`) followed by one Halley refinement step against
//!   the CDF above.
//!
//! # References
//!
//! - Hart (1968), "Computer Approximations"
//! - West (2005), "Better approximations to cumulative normal functions"
//! - Acklam (2003), "An algorithm for computing the inverse normal
//!   cumulative distribution function"

use std::f64::consts::PI;

/// Standard normal cumulative distribution function `Φ(x)`.
///
/// Returns exactly `0.0` for `-∞`, `1.0` for `+∞`, and NaN for NaN.
///
/// # Examples
///
/// ```
/// use u_linebalance::special::standard_normal_cdf;
///
/// assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-12);
/// assert_eq!(standard_normal_cdf(f64::INFINITY), 1.0);
/// ```
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let x_abs = x.abs();
    // Lower tail mass at -|x|
    let tail = if x_abs > 37.0 {
        0.0
    } else {
        let e = (-x_abs * x_abs / 2.0).exp();
        if x_abs < 7.071_067_811_865_47 {
            let mut num = 3.526_249_659_989_11e-2 * x_abs + 0.700_383_064_443_688;
            num = num * x_abs + 6.373_962_203_531_65;
            num = num * x_abs + 33.912_866_078_383;
            num = num * x_abs + 112.079_291_497_871;
            num = num * x_abs + 221.213_596_169_931;
            num = num * x_abs + 220.206_867_912_376;

            let mut den = 8.838_834_764_831_84e-2 * x_abs + 1.755_667_163_182_64;
            den = den * x_abs + 16.064_177_579_207;
            den = den * x_abs + 86.780_732_202_946_1;
            den = den * x_abs + 296.564_248_779_674;
            den = den * x_abs + 637.333_633_378_831;
            den = den * x_abs + 793.826_512_519_948;
            den = den * x_abs + 440.413_735_824_752;

            e * num / den
        } else {
            let mut frac = x_abs + 0.65;
            frac = x_abs + 4.0 / frac;
            frac = x_abs + 3.0 / frac;
            frac = x_abs + 2.0 / frac;
            frac = x_abs + 1.0 / frac;
            e / frac / (2.0 * PI).sqrt()
        }
    };

    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_69e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];

const P_LOW: f64 = 0.02425;

/// Inverse of the standard normal CDF (quantile function) `Φ⁻¹(p)`.
///
/// Domain handling:
/// - `p <= 0` → `-∞`
/// - `p >= 1` → `+∞`
/// - NaN → NaN
///
/// # Examples
///
/// ```
/// use u_linebalance::special::inverse_normal_cdf;
///
/// assert!((inverse_normal_cdf(0.975) - 1.959_964).abs() < 1e-5);
/// assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
/// ```
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let x = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        lower_tail(q)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -lower_tail(q)
    };

    // One Halley step
    let e = standard_normal_cdf(x) - p;
    let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
    x - u / (1.0 + x * u / 2.0)
}

fn lower_tail(q: f64) -> f64 {
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
        / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
}
