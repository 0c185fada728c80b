use std::f64::consts::PI;

use rand::Rng;

/// Half width of the window a shooter's ball settles in after a carreau.
pub const STAY_DISPLACEMENT: f64 = 100.0;

/// Draw a throw distance.
///
/// This is a Box-Muller normal draw with the given mean and standard
/// deviation, folded at zero. A distance can never be negative so any draw
/// below zero is reflected, which leaves a half-normal bump near the jack.
///
/// ```
/// use petanque_sim::core::sample_distance;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let d = sample_distance(&mut rng, 50.0, 20.0);
/// assert!(d >= 0.0);
/// ```
pub fn sample_distance<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u: f64 = rng.random();
    let v: f64 = rng.random();
    // u is in [0, 1) so 1 - u never hits ln(0)
    let z = (-2.0 * (1.0 - u).ln()).sqrt() * (2.0 * PI * v).cos();
    (z * std_dev + mean).abs()
}

/// Where a shooter's ball comes to rest after knocking out a ball at
/// `target_distance`: uniform within [`STAY_DISPLACEMENT`] of the vacated
/// spot, folded at zero.
pub fn sample_stay_distance<R: Rng + ?Sized>(rng: &mut R, target_distance: f64) -> f64 {
    let displacement = rng.random::<f64>() * 2.0 * STAY_DISPLACEMENT - STAY_DISPLACEMENT;
    (target_distance + displacement).abs()
}

/// The normal density of a throw landing at `x`, ignoring the fold at zero.
pub fn normal_density(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_samples_are_never_negative() {
        let mut rng = StdRng::seed_from_u64(420);
        for _ in 0..10_000 {
            assert!(sample_distance(&mut rng, 5.0, 40.0) >= 0.0);
        }
    }

    #[test]
    fn test_sample_mean_is_close_when_far_from_zero() {
        let mut rng = StdRng::seed_from_u64(99);
        let n = 20_000;
        let total: f64 = (0..n).map(|_| sample_distance(&mut rng, 500.0, 20.0)).sum();
        let mean = total / n as f64;
        // Standard error is 20 / sqrt(20_000) ~= 0.14
        assert!((mean - 500.0).abs() < 1.0, "mean was {mean}");
    }

    #[test]
    fn test_zero_std_dev_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_relative_eq!(42.0, sample_distance(&mut rng, 42.0, 0.0));
    }

    #[test]
    fn test_stay_distance_window() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5_000 {
            let d = sample_stay_distance(&mut rng, 250.0);
            assert!((150.0..=350.0).contains(&d));
        }
        for _ in 0..5_000 {
            assert!(sample_stay_distance(&mut rng, 10.0) >= 0.0);
        }
    }

    #[test]
    fn test_normal_density_peak() {
        let peak = normal_density(50.0, 50.0, 20.0);
        assert_relative_eq!(peak, 1.0 / (20.0 * (2.0 * PI).sqrt()), epsilon = 1e-12);
        assert!(normal_density(70.0, 50.0, 20.0) < peak);
        assert_relative_eq!(
            normal_density(30.0, 50.0, 20.0),
            normal_density(70.0, 50.0, 20.0),
            epsilon = 1e-12
        );
    }
}
