//! Configuration loader - YAML map settings + .env secrets

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Map camera and figure styling, loaded from map.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub title_size: u32,
    pub title_color: String,
    pub center: Center,
    pub bearing: f64,
    pub pitch: f64,
    pub zoom: f64,
    pub style: String,
    pub hoverdistance: u32,
    /// Marker size for selected points
    pub selected_size: f64,
    pub selected_opacity: f64,
    pub unselected_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Mapping of devices".to_string(),
            title_size: 50,
            title_color: "red".to_string(),
            center: Center {
                lat: 48.814,
                lon: 2.377,
            },
            bearing: 25.0,
            pitch: 40.0,
            zoom: 15.0,
            style: "basic".to_string(),
            hoverdistance: 2,
            selected_size: 25.0,
            selected_opacity: 0.5,
            unselected_opacity: 1.0,
        }
    }
}

impl MapConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MapConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Secrets loaded from .env
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub mapbox_token: Option<String>,
    pub data_file: String,
    pub port: u16,
}

impl Secrets {
    /// Load secrets from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build secrets from any key lookup; blank token means no token
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Secrets {
            mapbox_token: lookup("MAPBOX_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()),
            data_file: lookup("DATA_FILE").unwrap_or_else(|| "data.csv".to_string()),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8050),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_camera() {
        let config = MapConfig::default();
        assert_eq!(config.center, Center { lat: 48.814, lon: 2.377 });
        assert_eq!(config.bearing, 25.0);
        assert_eq!(config.pitch, 40.0);
        assert_eq!(config.zoom, 15.0);
        assert_eq!(config.style, "basic");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zoom: 12\ntitle: Warehouse").unwrap();

        let config = MapConfig::load(file.path()).unwrap();
        assert_eq!(config.zoom, 12.0);
        assert_eq!(config.title, "Warehouse");
        assert_eq!(config.bearing, 25.0);
        assert_eq!(config.title_color, "red");
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_secrets_defaults() {
        let secrets = Secrets::from_lookup(lookup_from(&[]));
        assert_eq!(secrets.mapbox_token, None);
        assert_eq!(secrets.data_file, "data.csv");
        assert_eq!(secrets.port, 8050);
    }

    #[test]
    fn test_secrets_blank_token_and_bad_port() {
        let secrets = Secrets::from_lookup(lookup_from(&[
            ("MAPBOX_ACCESS_TOKEN", "   "),
            ("PORT", "eighty"),
        ]));
        assert_eq!(secrets.mapbox_token, None);
        assert_eq!(secrets.port, 8050);
    }

    #[test]
    fn test_secrets_from_values() {
        let secrets = Secrets::from_lookup(lookup_from(&[
            ("MAPBOX_ACCESS_TOKEN", "pk.abc"),
            ("DATA_FILE", "/srv/telemetry.csv"),
            ("PORT", "9000"),
        ]));
        assert_eq!(secrets.mapbox_token.as_deref(), Some("pk.abc"));
        assert_eq!(secrets.data_file, "/srv/telemetry.csv");
        assert_eq!(secrets.port, 9000);
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(MapConfig::load("/definitely/not/here.yaml").is_err());
    }
}
