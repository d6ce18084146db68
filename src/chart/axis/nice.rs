//! "Nice number" rounding for label intervals.

/// Round `v` to 1, 2 or 5 (or 10) times a power of ten.
pub fn round125(v: f64) -> f64 {
    let n = 10f64.powf(v.log10().floor());
    let msd = v / n;
    if msd < 1.5 {
        n
    } else if msd < 3.3 {
        2.0 * n
    } else if msd < 7.0 {
        5.0 * n
    } else {
        10.0 * n
    }
}

/// Smallest multiple of `t` not below `v`, tolerant to rounding noise.
pub fn round_up_125(v: f64, t: f64) -> f64 {
    t * ((v - 1e-10) / t).ceil()
}

/// Largest multiple of `t` not above `v`, tolerant to rounding noise.
pub fn round_down_125(v: f64, t: f64) -> f64 {
    t * ((v + 1e-10) / t).floor()
}

pub(crate) fn round_down(v: i64, factor: i64) -> i64 {
    v.div_euclid(factor) * factor
}

pub(crate) fn round_up(v: i64, factor: i64) -> i64 {
    (v + factor - 1).div_euclid(factor) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round125_picks_the_nearest_nice_step() {
        assert_eq!(round125(1.2), 1.0);
        assert_eq!(round125(3.0), 2.0);
        assert_eq!(round125(4.2), 5.0);
        assert_eq!(round125(8.0), 10.0);
        assert!((round125(0.023) - 0.02).abs() < 1e-12);
        assert_eq!(round125(97.0 / 9.0), 10.0);
    }

    #[test]
    fn limits_snap_outwards() {
        assert_eq!(round_up_125(97.0, 10.0), 100.0);
        assert_eq!(round_up_125(100.0, 10.0), 100.0);
        assert_eq!(round_down_125(-5.0, 10.0), -10.0);
        assert_eq!(round_down_125(20.0, 10.0), 20.0);
    }

    #[test]
    fn integer_rounding() {
        assert_eq!(round_down(7, 3), 6);
        assert_eq!(round_up(7, 7), 7);
        assert_eq!(round_up(8, 7), 14);
        assert_eq!(round_up(0, 7), 0);
    }
}
