use thiserror::Error;

/// Lookup failures against the tile style registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("unknown map style key: {0:?}")]
    UnknownStyle(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("coordinate out of range: lat {latitude}, lng {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },

    #[error("{kind} needs at least {required} points, got {actual}")]
    TooFewPoints {
        kind: &'static str,
        required: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("zoom bounds invalid: min {min}, max {max}")]
    ZoomBounds { min: u8, max: u8 },

    #[error("{field} zoom {zoom} outside {min}..={max}")]
    ZoomOutOfBounds {
        field: &'static str,
        zoom: u8,
        min: u8,
        max: u8,
    },

    #[error("reference point: {0}")]
    Reference(#[from] GeometryError),
}
