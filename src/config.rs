//! Static configuration for the celestial scene
//!
//! Loaded once at startup from `config.json` in the platform config directory:
//! - macOS: ~/Library/Application Support/earthdesk/
//! - Linux: ~/.config/earthdesk/
//! - Windows: %APPDATA%\earthdesk\config\
//!
//! Body entries are overrides on the built-in catalog below: a boolean toggles
//! the body, an object replaces only the fields it names. Bodies not in the
//! catalog must give at least `kind` and `radius`.

use anyhow::Context;
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Typed configuration validation failures.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("body `{body}`: {field} must be positive and finite, got {value}")]
    NonPositive {
        body: String,
        field: &'static str,
        value: f64,
    },
    #[error("body `{body}`: missing required field `{field}` for this kind")]
    MissingField { body: String, field: &'static str },
    #[error("body `{body}`: eccentricity must be in [0, 1), got {value}")]
    Eccentricity { body: String, value: f64 },
    #[error("body `{body}`: ring inner radius {inner} must be below outer radius {outer}")]
    RingBounds { body: String, inner: f64, outer: f64 },
    #[error("time scale must be positive and finite, got {0}")]
    TimeScale(f64),
    #[error("sun update interval must be positive, got {0} s")]
    UpdateInterval(f64),
    #[error("sun light distance must be positive, got {0}")]
    SunDistance(f64),
    #[error("fixed sun declination must be within [-90, 90], got {0}")]
    Declination(f64),
    #[error("unknown sun declination mode `{0}` (expected \"auto\" or degrees)")]
    DeclinationKeyword(String),
}

/// How the sun's declination is chosen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DeclinationRepr", into = "DeclinationRepr")]
pub enum DeclinationMode {
    /// Derived from the calendar date.
    #[default]
    Auto,
    /// Fixed value in degrees, e.g. for previewing a season.
    Fixed(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DeclinationRepr {
    Keyword(String),
    Degrees(f64),
}

impl TryFrom<DeclinationRepr> for DeclinationMode {
    type Error = ConfigError;

    fn try_from(value: DeclinationRepr) -> Result<Self, Self::Error> {
        match value {
            DeclinationRepr::Keyword(k) if k.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            DeclinationRepr::Keyword(k) => Err(ConfigError::DeclinationKeyword(k)),
            DeclinationRepr::Degrees(d) => Ok(Self::Fixed(d)),
        }
    }
}

impl From<DeclinationMode> for DeclinationRepr {
    fn from(value: DeclinationMode) -> Self {
        match value {
            DeclinationMode::Auto => Self::Keyword("auto".to_string()),
            DeclinationMode::Fixed(d) => Self::Degrees(d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKindConfig {
    Satellite,
    Star,
    Planet,
    Comet,
}

/// Per-body configuration. Distances are in Earth radii, periods in days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyConfig {
    pub enabled: bool,
    pub kind: BodyKindConfig,
    pub radius: f64,
    pub orbit_radius: Option<f64>,
    pub orbit_period_days: Option<f64>,
    pub orbit_eccentricity: Option<f64>,
    pub visual_distance: Option<f64>,
    pub has_rings: bool,
    pub ring_inner_radius: Option<f64>,
    pub ring_outer_radius: Option<f64>,
    pub tail_length: Option<f64>,
    /// sRGB base color
    pub color: [f32; 3],
}

const DEFAULT_BODY_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// A body entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum BodyOverride {
    Toggle(bool),
    Fields(BodyPatch),
}

/// Field-wise override; absent fields keep the catalog value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct BodyPatch {
    enabled: Option<bool>,
    kind: Option<BodyKindConfig>,
    radius: Option<f64>,
    orbit_radius: Option<f64>,
    orbit_period_days: Option<f64>,
    orbit_eccentricity: Option<f64>,
    visual_distance: Option<f64>,
    has_rings: Option<bool>,
    ring_inner_radius: Option<f64>,
    ring_outer_radius: Option<f64>,
    tail_length: Option<f64>,
    color: Option<[f32; 3]>,
}

impl BodyPatch {
    fn apply_to(self, base: BodyConfig) -> BodyConfig {
        BodyConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            kind: self.kind.unwrap_or(base.kind),
            radius: self.radius.unwrap_or(base.radius),
            orbit_radius: self.orbit_radius.or(base.orbit_radius),
            orbit_period_days: self.orbit_period_days.or(base.orbit_period_days),
            orbit_eccentricity: self.orbit_eccentricity.or(base.orbit_eccentricity),
            visual_distance: self.visual_distance.or(base.visual_distance),
            has_rings: self.has_rings.unwrap_or(base.has_rings),
            ring_inner_radius: self.ring_inner_radius.or(base.ring_inner_radius),
            ring_outer_radius: self.ring_outer_radius.or(base.ring_outer_radius),
            tail_length: self.tail_length.or(base.tail_length),
            color: self.color.unwrap_or(base.color),
        }
    }

    /// A body with no catalog entry to fall back on.
    fn into_new_body(self, key: &str) -> Result<BodyConfig, ConfigError> {
        let missing = |field| ConfigError::MissingField {
            body: key.to_string(),
            field,
        };
        let kind = self.kind.ok_or_else(|| missing("kind"))?;
        let radius = self.radius.ok_or_else(|| missing("radius"))?;
        Ok(self.apply_to(BodyConfig::new(kind, radius, DEFAULT_BODY_COLOR)))
    }
}

/// Merge file entries onto the catalog. Entries that cannot become a body
/// are dropped with a warning so the rest of the file still applies.
fn merge_with_catalog(
    overrides: BTreeMap<String, BodyOverride>,
) -> BTreeMap<String, BodyConfig> {
    let mut bodies = builtin_bodies();
    for (key, entry) in overrides {
        let merged = match (bodies.remove(&key), entry) {
            (Some(base), BodyOverride::Toggle(enabled)) => Ok(BodyConfig { enabled, ..base }),
            (Some(base), BodyOverride::Fields(patch)) => Ok(patch.apply_to(base)),
            (None, BodyOverride::Toggle(_)) => Err(ConfigError::MissingField {
                body: key.clone(),
                field: "kind",
            }),
            (None, BodyOverride::Fields(patch)) => patch.into_new_body(&key),
        };
        match merged {
            Ok(body) => {
                bodies.insert(key, body);
            }
            Err(err) => warn!("Ignoring body entry: {}", err),
        }
    }
    bodies
}

fn deserialize_bodies<'de, D>(deserializer: D) -> Result<BTreeMap<String, BodyConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, BodyOverride>::deserialize(deserializer)?;
    Ok(merge_with_catalog(overrides))
}

fn positive(body: &str, field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive {
            body: body.to_string(),
            field,
            value,
        })
    }
}

fn required(body: &str, field: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingField {
        body: body.to_string(),
        field,
    })?;
    positive(body, field, value)
}

impl BodyConfig {
    fn new(kind: BodyKindConfig, radius: f64, color: [f32; 3]) -> Self {
        Self {
            enabled: true,
            kind,
            radius,
            orbit_radius: None,
            orbit_period_days: None,
            orbit_eccentricity: None,
            visual_distance: None,
            has_rings: false,
            ring_inner_radius: None,
            ring_outer_radius: None,
            tail_length: None,
            color,
        }
    }

    fn orbiting(
        kind: BodyKindConfig,
        radius: f64,
        orbit_radius: f64,
        period_days: f64,
        color: u32,
    ) -> Self {
        Self {
            orbit_radius: Some(orbit_radius),
            orbit_period_days: Some(period_days),
            ..Self::new(kind, radius, rgb(color))
        }
    }

    /// Check the fields required by this body's motion law.
    pub fn validate(&self, body: &str) -> Result<(), ConfigError> {
        positive(body, "radius", self.radius)?;
        match self.kind {
            BodyKindConfig::Star => {
                if let Some(d) = self.visual_distance {
                    positive(body, "visual_distance", d)?;
                }
            }
            BodyKindConfig::Satellite | BodyKindConfig::Planet => {
                required(body, "orbit_radius", self.orbit_radius)?;
                required(body, "orbit_period_days", self.orbit_period_days)?;
            }
            BodyKindConfig::Comet => {
                required(body, "orbit_radius", self.orbit_radius)?;
                required(body, "orbit_period_days", self.orbit_period_days)?;
                let e = self.orbit_eccentricity.unwrap_or(0.0);
                if !(0.0..1.0).contains(&e) {
                    return Err(ConfigError::Eccentricity {
                        body: body.to_string(),
                        value: e,
                    });
                }
                if let Some(len) = self.tail_length {
                    positive(body, "tail_length", len)?;
                }
            }
        }
        if self.has_rings {
            let inner = required(body, "ring_inner_radius", self.ring_inner_radius)?;
            let outer = required(body, "ring_outer_radius", self.ring_outer_radius)?;
            if inner >= outer {
                return Err(ConfigError::RingBounds {
                    body: body.to_string(),
                    inner,
                    outer,
                });
            }
        }
        Ok(())
    }
}

/// Convert a 0xRRGGBB literal to sRGB floats.
fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Built-in body catalog. Sizes and distances are compressed for display:
/// orbit radii follow sqrt(AU) * 3.2, periods are the real ones.
pub fn builtin_bodies() -> BTreeMap<String, BodyConfig> {
    use BodyKindConfig::*;

    let mut bodies = BTreeMap::new();
    bodies.insert(
        "moon".to_string(),
        BodyConfig::orbiting(Satellite, 0.027, 0.15, 27.3, 0xc9c9c9),
    );
    bodies.insert(
        "sun".to_string(),
        BodyConfig {
            visual_distance: Some(12.0),
            ..BodyConfig::new(Star, 0.6, rgb(0xffdd00))
        },
    );
    bodies.insert(
        "mercury".to_string(),
        BodyConfig::orbiting(Planet, 0.038, 2.0, 88.0, 0x8c7853),
    );
    bodies.insert(
        "venus".to_string(),
        BodyConfig::orbiting(Planet, 0.095, 2.7, 225.0, 0xffd89a),
    );
    bodies.insert(
        "mars".to_string(),
        BodyConfig::orbiting(Planet, 0.053, 3.9, 687.0, 0xcd5c5c),
    );
    bodies.insert(
        "jupiter".to_string(),
        BodyConfig::orbiting(Planet, 0.335, 7.3, 4333.0, 0xc88b3a),
    );
    bodies.insert(
        "saturn".to_string(),
        BodyConfig {
            has_rings: true,
            ring_inner_radius: Some(0.37),
            ring_outer_radius: Some(0.62),
            ..BodyConfig::orbiting(Planet, 0.307, 9.9, 10759.0, 0xfad5a5)
        },
    );
    bodies.insert(
        "uranus".to_string(),
        BodyConfig::orbiting(Planet, 0.200, 14.0, 30687.0, 0x4fd0e7),
    );
    bodies.insert(
        "neptune".to_string(),
        BodyConfig::orbiting(Planet, 0.197, 17.5, 60190.0, 0x2e5ee6),
    );
    bodies.insert(
        "comet".to_string(),
        BodyConfig {
            orbit_eccentricity: Some(0.85),
            tail_length: Some(1.2),
            ..BodyConfig::orbiting(Comet, 0.01, 8.0, 2740.0, 0xcccccc)
        },
    );
    bodies
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial distance from Earth's center in Earth radii
    pub distance: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub auto_rotate: bool,
    /// Radians per second
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 3.5,
            enable_rotate: true,
            enable_zoom: true,
            auto_rotate: false,
            auto_rotate_speed: 0.05,
        }
    }
}

/// Celestial scene configuration resource
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialConfig {
    /// Master switch for the moon, sun proxy, planets and comet
    pub enabled: bool,
    pub time_scale: f64,
    pub sun_declination: DeclinationMode,
    pub longitude_offset_deg: f64,
    pub show_orbits: bool,
    pub show_meridians: bool,
    pub sun_update_interval_secs: f64,
    /// Distance of the directional light from the origin
    pub sun_light_distance: f64,
    /// Seed for randomized initial planet phases; drawn at startup when absent
    pub seed: Option<u64>,
    pub location: Option<LocationConfig>,
    pub camera: CameraConfig,
    #[serde(deserialize_with = "deserialize_bodies")]
    pub bodies: BTreeMap<String, BodyConfig>,
}

impl Default for CelestialConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time_scale: 1000.0,
            sun_declination: DeclinationMode::Auto,
            longitude_offset_deg: 0.0,
            show_orbits: false,
            show_meridians: false,
            sun_update_interval_secs: 1.0,
            sun_light_distance: 5.0,
            seed: None,
            location: None,
            camera: CameraConfig::default(),
            bodies: builtin_bodies(),
        }
    }
}

impl CelestialConfig {
    /// Load from the platform config directory, or defaults if no file exists.
    pub fn load() -> Result<Self, anyhow::Error> {
        let proj_dirs = ProjectDirs::from("", "", "earthdesk")
            .ok_or_else(|| anyhow::anyhow!("Failed to resolve config directory"))?;
        Self::load_from(&proj_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate global settings. Bodies are validated individually when the
    /// registry is built so one bad entry only disables that body.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(ConfigError::TimeScale(self.time_scale));
        }
        if !(self.sun_update_interval_secs.is_finite() && self.sun_update_interval_secs > 0.0) {
            return Err(ConfigError::UpdateInterval(self.sun_update_interval_secs));
        }
        if !(self.sun_light_distance.is_finite() && self.sun_light_distance > 0.0) {
            return Err(ConfigError::SunDistance(self.sun_light_distance));
        }
        if let DeclinationMode::Fixed(d) = self.sun_declination
            && !(-90.0..=90.0).contains(&d)
        {
            return Err(ConfigError::Declination(d));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(test_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "earthdesk-config-{}-{}-{}",
            test_name,
            std::process::id(),
            nanos
        ))
    }

    fn write_config(test_name: &str, contents: &str) -> PathBuf {
        let dir = unique_temp_dir(test_name);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let config = CelestialConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bodies.len(), 10);
        for (key, body) in &config.bodies {
            assert!(body.validate(key).is_ok(), "{} should be valid", key);
        }
        assert_eq!(config.time_scale, 1000.0);
        assert_eq!(config.sun_declination, DeclinationMode::Auto);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = unique_temp_dir("missing").join(CONFIG_FILE_NAME);
        let config = CelestialConfig::load_from(&path).unwrap();
        assert_eq!(config, CelestialConfig::default());
    }

    #[test]
    fn test_partial_file_merges_with_catalog() {
        let path = write_config(
            "partial",
            r#"{
                "time_scale": 100.0,
                "sun_declination": -10.5,
                "bodies": {
                    "mars": { "kind": "planet", "radius": 0.1, "orbit_radius": 4.0, "orbit_period_days": 700.0 },
                    "comet": { "enabled": false, "kind": "comet", "radius": 0.01 }
                }
            }"#,
        );
        let config = CelestialConfig::load_from(&path).unwrap();
        assert_eq!(config.time_scale, 100.0);
        assert_eq!(config.sun_declination, DeclinationMode::Fixed(-10.5));
        assert_eq!(config.bodies["mars"].orbit_radius, Some(4.0));
        assert!(!config.bodies["comet"].enabled);
        // Untouched entries come from the catalog
        assert_eq!(config.bodies["saturn"], builtin_bodies()["saturn"]);
        assert_eq!(config.bodies.len(), 10);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_enabled_only_entry_keeps_rest_of_file() {
        let path = write_config(
            "enabled-only",
            r#"{ "time_scale": 100, "bodies": { "comet": { "enabled": false }, "venus": false } }"#,
        );
        let config = CelestialConfig::load_from(&path).unwrap();
        assert_eq!(config.time_scale, 100.0);
        assert!(!config.bodies["comet"].enabled);
        assert!(!config.bodies["venus"].enabled);
        // Only the toggle changed; the comet's orbit still comes from the catalog
        let catalog = builtin_bodies();
        assert_eq!(
            config.bodies["comet"],
            BodyConfig {
                enabled: false,
                ..catalog["comet"].clone()
            }
        );
        assert_eq!(config.bodies["mars"], catalog["mars"]);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_field_override_keeps_catalog_orbit() {
        let path = write_config(
            "field-override",
            r#"{ "bodies": { "mars": { "kind": "planet", "radius": 0.2 } } }"#,
        );
        let config = CelestialConfig::load_from(&path).unwrap();
        let mars = &config.bodies["mars"];
        assert_eq!(mars.radius, 0.2);
        assert_eq!(mars.orbit_radius, builtin_bodies()["mars"].orbit_radius);
        assert_eq!(mars.orbit_period_days, Some(687.0));
        assert!(mars.validate("mars").is_ok());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_new_body_needs_kind_and_radius() {
        let path = write_config(
            "new-body",
            r#"{
                "bodies": {
                    "ceres": { "kind": "planet", "radius": 0.02, "orbit_radius": 5.2, "orbit_period_days": 1682.0 },
                    "pluto": { "radius": 0.02 },
                    "eris": true
                }
            }"#,
        );
        let config = CelestialConfig::load_from(&path).unwrap();
        let ceres = &config.bodies["ceres"];
        assert_eq!(ceres.kind, BodyKindConfig::Planet);
        assert_eq!(ceres.color, DEFAULT_BODY_COLOR);
        assert!(ceres.validate("ceres").is_ok());
        // Incomplete entries are dropped, not fatal
        assert!(!config.bodies.contains_key("pluto"));
        assert!(!config.bodies.contains_key("eris"));
        assert_eq!(config.bodies.len(), 11);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_auto_keyword_parses() {
        let mode: DeclinationMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(mode, DeclinationMode::Auto);
        let mode: DeclinationMode = serde_json::from_str("23.44").unwrap();
        assert_eq!(mode, DeclinationMode::Fixed(23.44));
        assert!(serde_json::from_str::<DeclinationMode>("\"summer\"").is_err());
        assert_eq!(serde_json::to_string(&DeclinationMode::Auto).unwrap(), "\"auto\"");
    }

    #[test]
    fn test_invalid_global_settings_rejected() {
        let path = write_config("bad-scale", r#"{ "time_scale": 0.0 }"#);
        assert!(CelestialConfig::load_from(&path).is_err());
        fs::remove_dir_all(path.parent().unwrap()).ok();

        let config = CelestialConfig {
            sun_declination: DeclinationMode::Fixed(120.0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Declination(120.0)));
    }

    #[test]
    fn test_body_validation_errors() {
        let mut comet = builtin_bodies()["comet"].clone();
        comet.orbit_eccentricity = Some(1.0);
        assert_eq!(
            comet.validate("comet"),
            Err(ConfigError::Eccentricity {
                body: "comet".to_string(),
                value: 1.0
            })
        );

        let mut planet = builtin_bodies()["mars"].clone();
        planet.orbit_period_days = Some(-1.0);
        assert!(matches!(
            planet.validate("mars"),
            Err(ConfigError::NonPositive {
                field: "orbit_period_days",
                ..
            })
        ));

        planet.orbit_period_days = None;
        assert!(matches!(
            planet.validate("mars"),
            Err(ConfigError::MissingField { .. })
        ));

        let mut saturn = builtin_bodies()["saturn"].clone();
        saturn.ring_inner_radius = Some(0.7);
        assert!(matches!(
            saturn.validate("saturn"),
            Err(ConfigError::RingBounds { .. })
        ));
    }

    #[test]
    fn test_rgb_conversion() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
    }
}
