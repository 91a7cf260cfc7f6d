use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geo::Position;
use crate::icons::IconDescriptor;

/// A position fix reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub position: Position,
    /// Radius of uncertainty in meters.
    pub accuracy: Option<f64>,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp_ms: Option<f64>,
}

impl UserLocation {
    /// Build a fix from raw platform values. Accuracy that is negative or not
    /// finite is dropped rather than rejected.
    pub fn from_fix(
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        timestamp_ms: Option<f64>,
    ) -> Result<Self, GeometryError> {
        let position = Position::try_new(latitude, longitude)?;
        Ok(Self {
            position,
            accuracy: accuracy.filter(|a| a.is_finite() && *a >= 0.0),
            timestamp_ms: timestamp_ms.filter(|t| t.is_finite()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub stroke: &'static str,
    pub weight: f64,
    pub stroke_opacity: f64,
    pub fill: Option<&'static str>,
    pub fill_opacity: f64,
}

impl OverlayStyle {
    /// Stroke-only line.
    pub const fn line(stroke: &'static str, weight: f64, stroke_opacity: f64) -> Self {
        Self {
            stroke,
            weight,
            stroke_opacity,
            fill: None,
            fill_opacity: 0.0,
        }
    }

    /// Outlined and filled shape with an opaque stroke.
    pub const fn filled(
        stroke: &'static str,
        weight: f64,
        fill: &'static str,
        fill_opacity: f64,
    ) -> Self {
        Self {
            stroke,
            weight,
            stroke_opacity: 1.0,
            fill: Some(fill),
            fill_opacity,
        }
    }
}

/// A vector shape drawn over the tile layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Open polyline.
    Path {
        points: Vec<Position>,
        style: OverlayStyle,
    },
    /// Closed polygon.
    Area {
        points: Vec<Position>,
        style: OverlayStyle,
    },
    Circle {
        center: Position,
        radius_m: f64,
        style: OverlayStyle,
    },
}

impl Overlay {
    pub fn path(points: Vec<Position>, style: OverlayStyle) -> Result<Self, GeometryError> {
        check_points("path", 2, &points)?;
        Ok(Overlay::Path { points, style })
    }

    pub fn area(points: Vec<Position>, style: OverlayStyle) -> Result<Self, GeometryError> {
        check_points("area", 3, &points)?;
        Ok(Overlay::Area { points, style })
    }

    pub fn circle(center: Position, radius_m: f64, style: OverlayStyle) -> Self {
        Overlay::Circle {
            center,
            radius_m: radius_m.max(0.0),
            style,
        }
    }

    pub fn style(&self) -> &OverlayStyle {
        match self {
            Overlay::Path { style, .. } | Overlay::Area { style, .. } | Overlay::Circle { style, .. } => style,
        }
    }
}

fn check_points(kind: &'static str, required: usize, points: &[Position]) -> Result<(), GeometryError> {
    if points.len() < required {
        return Err(GeometryError::TooFewPoints {
            kind,
            required,
            actual: points.len(),
        });
    }
    if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
        return Err(GeometryError::OutOfRange {
            latitude: bad.latitude,
            longitude: bad.longitude,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitCategory {
    Subway,
    Train,
    Park,
    Neighborhood,
    Hub,
}

impl std::fmt::Display for TransitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitCategory::Subway => write!(f, "subway"),
            TransitCategory::Train => write!(f, "train"),
            TransitCategory::Park => write!(f, "park"),
            TransitCategory::Neighborhood => write!(f, "neighborhood"),
            TransitCategory::Hub => write!(f, "hub"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitPoint {
    pub position: Position,
    pub name: &'static str,
    pub category: TransitCategory,
    pub icon: &'static IconDescriptor,
}
