//! Sun position from real UTC time
//!
//! The sub-solar point moves 15° of longitude per hour and drifts in latitude
//! with the seasons. Both are derived from the wall clock, never from the
//! accelerated simulation clock, so the day/night terminator always matches
//! the real world.

use bevy::math::DVec3;
use bevy::prelude::*;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeDelta, Timelike, Utc};
use std::f64::consts::TAU;

use crate::config::{CelestialConfig, DeclinationMode};
use crate::core::coordinates::geo_to_scene;

/// Obliquity used by the first-order declination model (degrees).
pub const MAX_DECLINATION_DEG: f64 = 23.44;
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// 1-based day number within the calendar year (Jan 1 = 1).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// First-order solar declination: δ = -23.44° · cos(2π/365 · (N + 10)).
/// The +10 puts the December solstice minimum near day 355.
pub fn solar_declination_deg(date: NaiveDate) -> f64 {
    let n = day_of_year(date) as f64;
    -MAX_DECLINATION_DEG * (TAU / 365.0 * (n + 10.0)).cos()
}

/// Longitude (degrees, in (-180, 180]) of the meridian at local solar noon.
/// UTC 12:00 is the prime meridian, UTC 00:00 the antimeridian.
pub fn illuminated_longitude_deg(utc: DateTime<Utc>) -> f64 {
    let hours = utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;
    180.0 - hours * DEGREES_PER_HOUR
}

/// Resolved sun state for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarState {
    /// Unit vector from Earth's center toward the sun.
    pub direction: DVec3,
    /// Light-source position: `direction` scaled to the configured distance.
    pub light_position: DVec3,
    pub declination_deg: f64,
    pub illuminated_longitude_deg: f64,
    pub computed_at: DateTime<Utc>,
}

/// Sun state for `instant`, with the declination calendar day given
/// explicitly.
pub fn solar_state_for(
    instant: DateTime<Utc>,
    calendar_date: NaiveDate,
    mode: DeclinationMode,
    distance: f64,
) -> SolarState {
    let illuminated_longitude_deg = illuminated_longitude_deg(instant);
    let declination_deg = match mode {
        DeclinationMode::Auto => solar_declination_deg(calendar_date),
        DeclinationMode::Fixed(deg) => deg,
    };

    let light_position = geo_to_scene(declination_deg, illuminated_longitude_deg, distance);
    let direction = light_position.normalize_or_zero();

    SolarState {
        direction,
        light_position,
        declination_deg,
        illuminated_longitude_deg,
        computed_at: instant,
    }
}

/// Sun state for `instant`, taking the declination day from the local
/// calendar.
pub fn compute_solar_direction(
    instant: DateTime<Utc>,
    mode: DeclinationMode,
    distance: f64,
) -> SolarState {
    let local_date = instant.with_timezone(&Local).date_naive();
    solar_state_for(instant, local_date, mode, distance)
}

/// Source of the current wall-clock instant.
pub trait WallClock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Throttled sun position calculator.
///
/// Recomputes only when at least `interval` of wall-clock time has passed
/// since the last computation, unless a verbose (forced) update is requested.
/// A clock that jumps backwards also triggers a recomputation.
#[derive(Resource)]
pub struct SunTracker {
    clock: Box<dyn WallClock>,
    mode: DeclinationMode,
    distance: f64,
    interval: TimeDelta,
    state: SolarState,
    computations: u64,
}

impl SunTracker {
    /// Create a tracker and perform the initial computation.
    pub fn new(
        clock: Box<dyn WallClock>,
        mode: DeclinationMode,
        distance: f64,
        interval_secs: f64,
    ) -> Self {
        let now = clock.now();
        let state = compute_solar_direction(now, mode, distance);
        let mut tracker = Self {
            clock,
            mode,
            distance,
            interval: TimeDelta::milliseconds((interval_secs * 1000.0).round() as i64),
            state,
            computations: 1,
        };
        tracker.log_state(true);
        tracker
    }

    pub fn from_config(config: &CelestialConfig) -> Self {
        Self::new(
            Box::new(SystemClock),
            config.sun_declination,
            config.sun_light_distance,
            config.sun_update_interval_secs,
        )
    }

    /// Current (possibly cached) state without touching the clock.
    pub fn state(&self) -> SolarState {
        self.state
    }

    /// Number of real computations performed so far.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Return the sun state, recomputing it if the update interval has
    /// elapsed or `verbose` forces it.
    pub fn update(&mut self, verbose: bool) -> SolarState {
        let now = self.clock.now();
        let elapsed = now.signed_duration_since(self.state.computed_at);
        let due = elapsed >= self.interval || elapsed < TimeDelta::zero();
        if !verbose && !due {
            return self.state;
        }

        self.state = compute_solar_direction(now, self.mode, self.distance);
        self.computations += 1;
        self.log_state(verbose);
        self.state
    }

    fn log_state(&self, verbose: bool) {
        let s = &self.state;
        let mode = match self.mode {
            DeclinationMode::Auto => "auto",
            DeclinationMode::Fixed(_) => "fixed",
        };
        let p = s.light_position;
        if verbose {
            info!(
                "UTC {} - sun over longitude {:.1}°, declination {:.1}° ({}) - light at ({:.2}, {:.2}, {:.2})",
                s.computed_at.format("%H:%M:%S"),
                s.illuminated_longitude_deg,
                s.declination_deg,
                mode,
                p.x,
                p.y,
                p.z
            );
        } else {
            debug!(
                "Sun updated: longitude {:.2}°, declination {:.2}° ({})",
                s.illuminated_longitude_deg, s.declination_deg, mode
            );
        }
    }
}

/// Unit sun direction consumed by lighting and day/night shading.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Deref)]
pub struct SunDirection(pub Vec3);

/// Throttled sun update, once per frame.
pub fn update_sun_tracker(
    mut tracker: ResMut<SunTracker>,
    mut sun_direction: ResMut<SunDirection>,
) {
    let state = tracker.update(false);
    sun_direction.set_if_neq(SunDirection(state.direction.as_vec3()));
}
