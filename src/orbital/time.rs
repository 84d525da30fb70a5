//! Simulation clock for orbital motion

use bevy::prelude::*;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Accumulated simulated time. Only ever increases; changing the time scale
/// changes the rate, never the phase.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationClock {
    elapsed_sim_secs: f64,
    time_scale: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(TimeScalePreset::VeryFast.scale())
    }
}

impl SimulationClock {
    pub fn new(time_scale: f64) -> Self {
        Self {
            elapsed_sim_secs: 0.0,
            time_scale,
        }
    }

    pub fn elapsed_sim_secs(&self) -> f64 {
        self.elapsed_sim_secs
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Advance by a real-time delta and return the simulated delta.
    /// Negative or non-finite deltas are treated as zero.
    pub fn advance(&mut self, delta_real_secs: f64) -> f64 {
        let delta = if delta_real_secs.is_finite() {
            delta_real_secs.max(0.0)
        } else {
            0.0
        };
        let scaled = delta * self.time_scale;
        self.elapsed_sim_secs += scaled;
        scaled
    }

    /// Change the time scale at runtime. Returns false and keeps the current
    /// scale when `scale` is not positive and finite.
    pub fn set_time_scale(&mut self, scale: f64) -> bool {
        if !(scale.is_finite() && scale > 0.0) {
            warn!("Ignoring invalid time scale: {}", scale);
            return false;
        }
        self.time_scale = scale;
        info!("Celestial time scale set to {}x", scale);
        true
    }
}

/// Named time-scale steps offered by the controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeScalePreset {
    Realtime,
    Fast,
    VeryFast,
    UltraFast,
}

impl TimeScalePreset {
    pub fn scale(self) -> f64 {
        match self {
            TimeScalePreset::Realtime => 1.0,
            TimeScalePreset::Fast => 100.0,
            TimeScalePreset::VeryFast => 1000.0,
            TimeScalePreset::UltraFast => 10000.0,
        }
    }
}
