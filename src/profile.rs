//! Consumer level profiles driven by the host between ticks.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A generator for a consumer's level multiplier over time.
///
/// The simulator never calls this itself; the engine writes `level_at(tick)`
/// into the consumer's `level` before building each snapshot.
///
/// # Examples
///
/// ```
/// use powernet_sim::profile::LoadProfile;
///
/// let mut lamp = LoadProfile::sine(1.0, 0.5, 24, 0.0, 0.0, 42);
/// let night = lamp.level_at(18);
/// let noon = lamp.level_at(6);
/// assert!(noon > night);
/// ```
#[derive(Debug, Clone)]
pub enum LoadProfile {
    /// Always the same level.
    Constant { level: f32 },
    /// `base + amplitude * sin(2π·tick/period + phase)` plus Gaussian noise.
    Sine {
        base: f32,
        amplitude: f32,
        period_ticks: usize,
        phase_rad: f32,
        noise_std: f32,
        rng: StdRng,
    },
}

impl LoadProfile {
    pub fn constant(level: f32) -> Self {
        Self::Constant { level }
    }

    /// Creates a sinusoidal profile.
    ///
    /// # Arguments
    ///
    /// * `base` - Mean level
    /// * `amplitude` - Peak deviation from the mean
    /// * `period_ticks` - Ticks per full cycle (values below 1 are treated as 1)
    /// * `phase_rad` - Phase offset in radians
    /// * `noise_std` - Standard deviation of the Gaussian noise
    /// * `seed` - Random seed for reproducible noise
    pub fn sine(
        base: f32,
        amplitude: f32,
        period_ticks: usize,
        phase_rad: f32,
        noise_std: f32,
        seed: u64,
    ) -> Self {
        Self::Sine {
            base,
            amplitude,
            period_ticks: period_ticks.max(1),
            phase_rad,
            noise_std,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Level multiplier for `tick`, never negative.
    pub fn level_at(&mut self, tick: usize) -> f32 {
        let level = match self {
            Self::Constant { level } => *level,
            Self::Sine {
                base,
                amplitude,
                period_ticks,
                phase_rad,
                noise_std,
                rng,
            } => {
                let period = (*period_ticks).max(1);
                let cycle = (tick % period) as f32 / period as f32;
                let angle = 2.0 * std::f32::consts::PI * cycle + *phase_rad;
                *base + *amplitude * angle.sin() + gaussian_noise(rng, *noise_std)
            }
        };
        level.max(0.0)
    }
}

/// Samples Gaussian noise using the Box-Muller transform.
///
/// Returns 0 for a non-positive standard deviation.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
