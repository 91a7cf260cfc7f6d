use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geo::Position;
use crate::geolocation::GeolocationOptions;
use crate::samples::REFERENCE_POINT;
use crate::styles::MapStyle;

/// Map settings. Every field has a default, so a partial JSON document only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub reference_point: Position,
    pub reference_name: String,
    pub welcome_line: String,
    /// Zoom used when no user location is known.
    pub default_zoom: u8,
    /// Zoom used once the user has been located.
    pub located_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub initial_style: MapStyle,
    pub geolocation: GeolocationOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            reference_point: REFERENCE_POINT,
            reference_name: "Boston, MA".to_string(),
            welcome_line: "Welcome to Transit Explorer".to_string(),
            default_zoom: 13,
            located_zoom: 15,
            min_zoom: 1,
            max_zoom: 18,
            initial_style: MapStyle::CartoVoyager,
            geolocation: GeolocationOptions::default(),
        }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_zoom > self.max_zoom || self.max_zoom > 22 {
            return Err(ConfigError::ZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        for (field, zoom) in [("default", self.default_zoom), ("located", self.located_zoom)] {
            if zoom < self.min_zoom || zoom > self.max_zoom {
                return Err(ConfigError::ZoomOutOfBounds {
                    field,
                    zoom,
                    min: self.min_zoom,
                    max: self.max_zoom,
                });
            }
        }
        Position::try_new(self.reference_point.latitude, self.reference_point.longitude)?;
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: i32) -> u8 {
        zoom.clamp(self.min_zoom as i32, self.max_zoom as i32) as u8
    }
}
