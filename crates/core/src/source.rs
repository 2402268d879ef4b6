//! Reading sources polled once per animation step
//!
//! A source yields one flat reading per valid sensor cell, in row-major order
//! over the valid cells. Hardware drivers implement [`ReadingSource`]; the two
//! sources here stand in for a device during demos and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Anything that can report the latest force frame
pub trait ReadingSource {
    /// `false` once the source has been disconnected
    fn is_running(&self) -> bool;

    /// Latest frame, or `None` when not running or no frame is available
    fn latest_readings(&mut self) -> Option<Vec<f64>>;

    fn disconnect(&mut self);
}

impl<S: ReadingSource + ?Sized> ReadingSource for Box<S> {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn latest_readings(&mut self) -> Option<Vec<f64>> {
        (**self).latest_readings()
    }

    fn disconnect(&mut self) {
        (**self).disconnect();
    }
}

/// Top of the cycling ramp, inclusive
const CYCLE_MODULUS: u64 = 1001;

/// Deterministic sawtooth data: poll `k` yields `(k + i * 10) % 1001` for sensor `i`
#[derive(Debug, Clone)]
pub struct CyclingSource {
    sensors: usize,
    iteration: u64,
    running: bool,
}

impl CyclingSource {
    pub fn new(sensors: usize) -> Self {
        Self {
            sensors,
            iteration: 0,
            running: true,
        }
    }

    pub fn sensors(&self) -> usize {
        self.sensors
    }
}

impl ReadingSource for CyclingSource {
    fn is_running(&self) -> bool {
        self.running
    }

    fn latest_readings(&mut self) -> Option<Vec<f64>> {
        if !self.running {
            return None;
        }
        self.iteration += 1;
        let k = self.iteration;
        Some(
            (0..self.sensors as u64)
                .map(|i| ((k + i * 10) % CYCLE_MODULUS) as f64)
                .collect(),
        )
    }

    fn disconnect(&mut self) {
        info!("CyclingSource: disconnected after {} polls", self.iteration);
        self.running = false;
    }
}

/// Tunables for [`SimulatedSource`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiteProfile {
    /// Force at full clench on a unit-gain sensor
    pub peak_force: f64,
    /// Polls per clench/release cycle
    pub period: u32,
    /// Half-width of the uniform additive noise
    pub noise: f64,
    /// Fraction of sensors that never register contact
    pub dead_fraction: f64,
}

impl Default for BiteProfile {
    fn default() -> Self {
        Self {
            peak_force: 900.0,
            period: 40,
            noise: 6.0,
            dead_fraction: 0.15,
        }
    }
}

/// Seeded bite simulation: a periodic clench envelope times a per-sensor gain, plus noise
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    profile: BiteProfile,
    gains: Vec<f64>,
    rng: StdRng,
    tick: u64,
    running: bool,
}

impl SimulatedSource {
    pub fn new(sensors: usize, seed: u64) -> Self {
        Self::with_profile(sensors, seed, BiteProfile::default())
    }

    pub fn with_profile(sensors: usize, seed: u64, profile: BiteProfile) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let gains = (0..sensors)
            .map(|_| {
                if rng.random::<f64>() < profile.dead_fraction {
                    0.0
                } else {
                    rng.random_range(0.2..1.2)
                }
            })
            .collect();
        debug!("SimulatedSource: {} sensors, seed {}", sensors, seed);
        Self {
            profile,
            gains,
            rng,
            tick: 0,
            running: true,
        }
    }

    /// Clench level in [0, 1] for a poll index
    pub fn envelope(&self, tick: u64) -> f64 {
        let period = u64::from(self.profile.period.max(1));
        let phase = (tick % period) as f64 / period as f64;
        // Raised cosine: released at phase 0, fully clenched at 0.5
        0.5 - 0.5 * (phase * std::f64::consts::TAU).cos()
    }

    pub fn sensors(&self) -> usize {
        self.gains.len()
    }
}

impl ReadingSource for SimulatedSource {
    fn is_running(&self) -> bool {
        self.running
    }

    fn latest_readings(&mut self) -> Option<Vec<f64>> {
        if !self.running {
            return None;
        }
        let level = self.envelope(self.tick) * self.profile.peak_force;
        self.tick += 1;
        let noise = self.profile.noise.abs();
        let rng = &mut self.rng;
        Some(
            self.gains
                .iter()
                .map(|&gain| {
                    let jitter = if noise > 0.0 {
                        rng.random_range(-noise..=noise)
                    } else {
                        0.0
                    };
                    (level * gain + jitter).max(0.0)
                })
                .collect(),
        )
    }

    fn disconnect(&mut self) {
        info!("SimulatedSource: disconnected after {} polls", self.tick);
        self.running = false;
    }
}
