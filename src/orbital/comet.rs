//! Comet orbit and tail geometry.
//!
//! The ellipse is centered on the origin rather than on a focus. Tail
//! brightness is tuned against that center-anchored path, so the two must
//! change together.

use bevy::math::{DQuat, DVec3};
use std::f64::consts::TAU;

use crate::orbital::time::SECONDS_PER_DAY;

/// Distance from the sun light at which the tails reach full intensity.
pub const TAIL_MIN_DISTANCE: f64 = 5.0;
/// Distance beyond which the tails fade to their base intensity.
pub const TAIL_MAX_DISTANCE: f64 = 15.0;
/// Weight of the orbital tangent bent into the dust tail direction.
pub const DUST_TAIL_LAG: f64 = 0.3;
/// Axis the tail geometry is built along before orientation.
pub const TAIL_REST_AXIS: DVec3 = DVec3::NEG_X;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalOrbit {
    pub semi_major: f64,
    pub eccentricity: f64,
    pub period_days: f64,
}

impl EllipticalOrbit {
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    pub fn period_secs(&self) -> f64 {
        self.period_days * SECONDS_PER_DAY
    }

    /// Phase advance (radians) for a simulated time step.
    pub fn phase_delta(&self, delta_sim_secs: f64) -> f64 {
        delta_sim_secs / self.period_secs() * TAU
    }

    pub fn position(&self, phase: f64) -> DVec3 {
        DVec3::new(
            self.semi_major * phase.cos(),
            0.0,
            self.semi_minor() * phase.sin(),
        )
    }
}

/// 1 near the sun, 0 far away, linear in between.
pub fn tail_intensity(distance_to_sun: f64) -> f64 {
    let t = (distance_to_sun - TAIL_MIN_DISTANCE) / (TAIL_MAX_DISTANCE - TAIL_MIN_DISTANCE);
    1.0 - t.clamp(0.0, 1.0)
}

/// Derived comet appearance for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CometTails {
    pub distance_to_sun: f64,
    pub intensity: f64,
    /// Anti-sunward unit direction; the ion tail points straight along it.
    pub ion_direction: DVec3,
    /// Anti-sunward direction bent toward the orbital velocity.
    pub dust_direction: DVec3,
    pub ion_rotation: DQuat,
    pub dust_rotation: DQuat,
    pub coma_scale: f64,
    pub coma_opacity: f64,
    pub ion_opacity: f64,
    pub dust_opacity: f64,
}

impl Default for CometTails {
    fn default() -> Self {
        Self::from_directions(TAIL_MAX_DISTANCE, TAIL_REST_AXIS, TAIL_REST_AXIS)
    }
}

impl CometTails {
    fn from_directions(distance_to_sun: f64, ion_direction: DVec3, dust_direction: DVec3) -> Self {
        let intensity = tail_intensity(distance_to_sun);
        Self {
            distance_to_sun,
            intensity,
            ion_direction,
            dust_direction,
            ion_rotation: DQuat::from_rotation_arc(TAIL_REST_AXIS, ion_direction),
            dust_rotation: DQuat::from_rotation_arc(TAIL_REST_AXIS, dust_direction),
            coma_scale: 1.0 + intensity * 2.0,
            coma_opacity: 0.15 + intensity * 0.2,
            ion_opacity: 0.5 + intensity * 0.3,
            dust_opacity: 0.3 + intensity * 0.4,
        }
    }

    /// Tail state for a comet at `position` and `phase`, given the sun light
    /// position for the same tick.
    pub fn compute(position: DVec3, phase: f64, sun_light_position: DVec3) -> Self {
        let away = position - sun_light_position;
        let distance_to_sun = away.length();
        let ion_direction = match away.try_normalize() {
            Some(dir) => dir,
            None => TAIL_REST_AXIS,
        };

        let tangent = DVec3::new(-phase.sin(), 0.0, phase.cos());
        let dust_direction = (ion_direction + tangent * DUST_TAIL_LAG)
            .try_normalize()
            .unwrap_or(ion_direction);

        Self::from_directions(distance_to_sun, ion_direction, dust_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn halley_like() -> EllipticalOrbit {
        EllipticalOrbit {
            semi_major: 8.0,
            eccentricity: 0.85,
            period_days: 2740.0,
        }
    }

    #[test]
    fn test_ellipse_equation_holds() {
        let orbit = halley_like();
        let a = orbit.semi_major;
        let b = orbit.semi_minor();
        for i in 0..64 {
            let p = orbit.position(i as f64 * 0.37);
            let lhs = (p.x / a).powi(2) + (p.z / b).powi(2);
            assert!((lhs - 1.0).abs() < EPS);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_zero_eccentricity_is_circle() {
        let orbit = EllipticalOrbit {
            eccentricity: 0.0,
            ..halley_like()
        };
        assert_eq!(orbit.semi_minor(), orbit.semi_major);
    }

    #[test]
    fn test_intensity_boundaries() {
        assert_eq!(tail_intensity(TAIL_MIN_DISTANCE), 1.0);
        assert_eq!(tail_intensity(0.0), 1.0);
        assert_eq!(tail_intensity(TAIL_MAX_DISTANCE), 0.0);
        assert_eq!(tail_intensity(100.0), 0.0);
        assert!((tail_intensity(10.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_intensity_continuous_at_boundaries() {
        let h = 1e-9;
        assert!((tail_intensity(TAIL_MIN_DISTANCE + h) - 1.0).abs() < 1e-6);
        assert!(tail_intensity(TAIL_MAX_DISTANCE - h).abs() < 1e-6);
    }

    #[test]
    fn test_ion_tail_points_away_from_sun() {
        let sun = DVec3::new(0.0, 0.0, 5.0);
        let comet = DVec3::new(8.0, 0.0, 5.0);
        let tails = CometTails::compute(comet, 0.0, sun);
        assert!((tails.ion_direction - DVec3::X).length() < EPS);
        assert!((tails.distance_to_sun - 8.0).abs() < EPS);
        // Rest axis is rotated onto the anti-sunward direction
        let rotated = tails.ion_rotation * TAIL_REST_AXIS;
        assert!((rotated - DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_dust_tail_lags_along_tangent() {
        let sun = DVec3::new(0.0, 0.0, 5.0);
        let comet = DVec3::new(8.0, 0.0, 5.0);
        let tails = CometTails::compute(comet, 0.0, sun);
        // Tangent at phase 0 is +Z
        let expected = (DVec3::X + DVec3::Z * DUST_TAIL_LAG).normalize();
        assert!((tails.dust_direction - expected).length() < EPS);
        let rotated = tails.dust_rotation * TAIL_REST_AXIS;
        assert!((rotated - expected).length() < 1e-9);
    }

    #[test]
    fn test_coincident_with_sun_stays_finite() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let tails = CometTails::compute(p, 1.0, p);
        assert_eq!(tails.intensity, 1.0);
        assert!(tails.ion_direction.is_finite());
        assert!(tails.dust_direction.is_finite());
    }

    #[test]
    fn test_visual_extras_follow_intensity() {
        let near = CometTails::compute(DVec3::new(5.0, 0.0, 0.0), 0.0, DVec3::ZERO);
        assert_eq!(near.intensity, 1.0);
        assert!((near.coma_scale - 3.0).abs() < EPS);
        assert!((near.coma_opacity - 0.35).abs() < EPS);
        assert!((near.ion_opacity - 0.8).abs() < EPS);
        assert!((near.dust_opacity - 0.7).abs() < EPS);

        let far = CometTails::default();
        assert_eq!(far.intensity, 0.0);
        assert_eq!(far.coma_scale, 1.0);
    }
}
