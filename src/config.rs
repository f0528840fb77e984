//! Site-profile configuration: typed site identifiers, per-site physical
//! parameters, and a TOML-backed registry with a documented default.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Identifier of the built-in fallback profile.
pub const DEFAULT_SITE: &str = "KIG-001";

/// An explicit site identifier.
///
/// Profile lookup is keyed by this opaque code; it carries no display
/// text and is never derived by parsing a human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Creates a site identifier from a code such as `"KIG-001"`.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Static physical parameters of one installation.
///
/// Immutable after construction; all fields default to the built-in
/// fallback profile so partial TOML sections stay valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteProfile {
    /// Total effective panel area (m²).
    pub panel_area_m2: f64,
    /// Rated panel efficiency (0.0–1.0).
    pub panel_efficiency: f64,
    /// Fractional panel output loss per °C above 25 °C.
    pub panel_temp_coeff: f64,
    /// Battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Battery charge efficiency (0.0–1.0).
    pub battery_charge_eff: f64,
    /// Battery heat generation coefficient (°C per kWh of throughput).
    pub battery_thermal_coeff: f64,
    /// Average site load (kW).
    pub base_load_kw: f64,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            panel_area_m2: 50.0,
            panel_efficiency: 0.21,
            panel_temp_coeff: 0.003,
            battery_capacity_kwh: 40.0,
            battery_charge_eff: 0.95,
            battery_thermal_coeff: 0.005,
            base_load_kw: 3.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g. `"profiles.KIG-001.battery_capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl SiteProfile {
    /// Validates all fields and returns a list of errors, empty when valid.
    ///
    /// `prefix` names the profile in error field paths.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigError {
                field: format!("{prefix}.{field}"),
                message: message.into(),
            });
        };

        if self.panel_area_m2 <= 0.0 {
            push("panel_area_m2", "must be > 0");
        }
        if !(self.panel_efficiency > 0.0 && self.panel_efficiency <= 1.0) {
            push("panel_efficiency", "must be in (0.0, 1.0]");
        }
        if self.panel_temp_coeff < 0.0 {
            push("panel_temp_coeff", "must be >= 0");
        }
        if self.battery_capacity_kwh <= 0.0 {
            push("battery_capacity_kwh", "must be > 0");
        }
        if !(self.battery_charge_eff > 0.0 && self.battery_charge_eff <= 1.0) {
            push("battery_charge_eff", "must be in (0.0, 1.0]");
        }
        if self.battery_thermal_coeff < 0.0 {
            push("battery_thermal_coeff", "must be >= 0");
        }
        if self.base_load_kw < 0.0 {
            push("base_load_kw", "must be >= 0");
        }

        errors
    }
}

/// On-disk registry shape parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RegistryFile {
    profiles: HashMap<SiteId, SiteProfile>,
}

/// Deterministic site-profile lookup with a built-in default.
///
/// Unknown site identifiers resolve to the [`DEFAULT_SITE`] profile; that
/// fallback is part of the contract, not an error condition.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<SiteId, SiteProfile>,
    fallback: SiteProfile,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Returns the registry holding only the built-in default profile.
    pub fn builtin() -> Self {
        let fallback = SiteProfile::default();
        let mut profiles = HashMap::new();
        profiles.insert(SiteId::new(DEFAULT_SITE), fallback.clone());
        Self { profiles, fallback }
    }

    /// Parses a registry from a TOML string, layered over the built-in
    /// default.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown
    /// fields, or any profile fails validation.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: RegistryFile = toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })?;

        let mut registry = Self::builtin();
        for (site, profile) in file.profiles {
            if let Some(err) = profile
                .validate(&format!("profiles.{site}"))
                .into_iter()
                .next()
            {
                return Err(err);
            }
            registry.profiles.insert(site, profile);
        }
        Ok(registry)
    }

    /// Parses a registry from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "profiles".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Adds or replaces a profile.
    pub fn insert(&mut self, site: SiteId, profile: SiteProfile) {
        self.profiles.insert(site, profile);
    }

    /// Looks up the profile for a site, falling back to the default
    /// profile when the identifier is unrecognized.
    pub fn resolve(&self, site: &SiteId) -> &SiteProfile {
        self.profiles.get(site).unwrap_or(&self.fallback)
    }

    /// Returns the profile only if the site is explicitly registered.
    pub fn get(&self, site: &SiteId) -> Option<&SiteProfile> {
        self.profiles.get(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_is_valid() {
        let profile = SiteProfile::default();
        let errors = profile.validate("default");
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn unknown_site_resolves_to_fallback() {
        let registry = ProfileRegistry::builtin();
        let profile = registry.resolve(&SiteId::new("NBO-404"));
        assert_eq!(*profile, SiteProfile::default());
        assert!(registry.get(&SiteId::new("NBO-404")).is_none());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[profiles."NBO-002"]
panel_area_m2 = 80.0
panel_efficiency = 0.19
panel_temp_coeff = 0.004
battery_capacity_kwh = 60.0
battery_charge_eff = 0.93
battery_thermal_coeff = 0.006
base_load_kw = 5.0
"#;
        let registry = ProfileRegistry::from_toml_str(toml);
        assert!(
            registry.is_ok(),
            "valid TOML should parse: {:?}",
            registry.err()
        );
        let registry = registry.ok();
        let site = SiteId::new("NBO-002");
        assert_eq!(
            registry
                .as_ref()
                .and_then(|r| r.get(&site))
                .map(|p| p.battery_capacity_kwh),
            Some(60.0)
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[profiles."NBO-002"]
battery_capacity_kwh = 25.0
"#;
        let registry = ProfileRegistry::from_toml_str(toml).ok();
        let site = SiteId::new("NBO-002");
        let profile = registry.as_ref().and_then(|r| r.get(&site));
        assert_eq!(profile.map(|p| p.battery_capacity_kwh), Some(25.0));
        // untouched fields fall back to the default profile
        assert_eq!(profile.map(|p| p.panel_area_m2), Some(50.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[profiles."NBO-002"]
bogus_field = true
"#;
        assert!(ProfileRegistry::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_capacity() {
        let toml = r#"
[profiles."BAD-001"]
battery_capacity_kwh = 0.0
"#;
        let err = ProfileRegistry::from_toml_str(toml);
        assert!(err.is_err());
        let e = err.err();
        assert_eq!(
            e.as_ref().map(|e| e.field.clone()),
            Some("profiles.BAD-001.battery_capacity_kwh".to_string())
        );
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut profile = SiteProfile::default();
        profile.battery_charge_eff = 1.5;
        let errors = profile.validate("p");
        assert!(errors.iter().any(|e| e.field == "p.battery_charge_eff"));
    }

    #[test]
    fn validation_catches_negative_base_load() {
        let mut profile = SiteProfile::default();
        profile.base_load_kw = -1.0;
        let errors = profile.validate("p");
        assert!(errors.iter().any(|e| e.field == "p.base_load_kw"));
    }

    #[test]
    fn site_id_is_opaque() {
        // A display label with whitespace is a distinct key, never split.
        let registry = ProfileRegistry::builtin();
        let labeled = SiteId::new("KIG-001 (Kigali HQ)");
        assert!(registry.get(&labeled).is_none());
        assert_eq!(*registry.resolve(&labeled), SiteProfile::default());
    }
}
