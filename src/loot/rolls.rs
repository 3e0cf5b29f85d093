//! Small random helpers shared by the placers.

use rand::Rng;

/// Resamples attempted before a negative normal draw falls back to the mean.
const NORMAL_RESAMPLE_ATTEMPTS: u32 = 100;

/// Uniform integer in `[min, max]`, tolerant of swapped bounds.
pub fn uniform_int(rng: &mut impl Rng, min: u32, max: u32) -> u32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// One Box-Muller sample from N(mean, std).
pub fn normal_sample(rng: &mut impl Rng, mean: f64, std: f64) -> f64 {
    // gen() is in [0, 1); shift to (0, 1] so ln never sees zero
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + z * std
}

/// A non-negative sample from N(mean, std); negative draws are retried.
pub fn normally_distributed_count(rng: &mut impl Rng, mean: f64, std: f64) -> f64 {
    for _ in 0..NORMAL_RESAMPLE_ATTEMPTS {
        let value = normal_sample(rng, mean, std);
        if value >= 0.0 {
            return value;
        }
    }
    mean.max(0.0)
}

/// Rolls a percent chance (0-100).
pub fn roll_percent(rng: &mut impl Rng, percent: f64) -> bool {
    if percent >= 100.0 {
        return true;
    }
    if percent <= 0.0 {
        return false;
    }
    rng.gen::<f64>() * 100.0 < percent
}
