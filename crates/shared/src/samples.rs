//! Demonstration data around downtown Boston.

use once_cell::sync::Lazy;

use crate::geo::Position;
use crate::icons::ICONS;
use crate::models::{Overlay, OverlayStyle, TransitCategory, TransitPoint};

/// Boston Common; the map's fallback center.
pub const REFERENCE_POINT: Position = Position::new(42.3601, -71.0589);

pub const ROUTE_STYLE: OverlayStyle = OverlayStyle::line("#ff0000", 4.0, 0.7);
pub const PARK_STYLE: OverlayStyle = OverlayStyle::filled("#00aa00", 2.0, "#00ff00", 0.3);
pub const DEMO_CIRCLE_STYLE: OverlayStyle = OverlayStyle::filled("#0066cc", 2.0, "#3399ff", 0.2);
pub const DEMO_CIRCLE_RADIUS_M: f64 = 500.0;

/// A bus-route style line: Boston Common, Downtown Crossing, South Station,
/// Chinatown.
pub const ROUTE_LINE: [Position; 4] = [
    Position::new(42.3601, -71.0589),
    Position::new(42.3584, -71.0638),
    Position::new(42.3550, -71.0605),
    Position::new(42.3523, -71.0556),
];

pub const PARK_AREA: [Position; 4] = [
    Position::new(42.3665, -71.0711),
    Position::new(42.3655, -71.0685),
    Position::new(42.3635, -71.0695),
    Position::new(42.3645, -71.0721),
];

pub struct SampleGeometry {
    pub route: Overlay,
    pub park: Overlay,
    pub transit_points: Vec<TransitPoint>,
}

impl SampleGeometry {
    /// Fixed overlays in draw order.
    pub fn overlays(&self) -> [&Overlay; 2] {
        [&self.route, &self.park]
    }
}

/// The 500 m demo circle, drawn around whatever the map treats as its
/// reference point.
pub fn demo_circle(center: Position) -> Overlay {
    Overlay::circle(center, DEMO_CIRCLE_RADIUS_M, DEMO_CIRCLE_STYLE)
}

fn build_samples() -> SampleGeometry {
    SampleGeometry {
        route: Overlay::Path {
            points: ROUTE_LINE.to_vec(),
            style: ROUTE_STYLE,
        },
        park: Overlay::Area {
            points: PARK_AREA.to_vec(),
            style: PARK_STYLE,
        },
        transit_points: vec![
            TransitPoint {
                position: Position::new(42.3584, -71.0638),
                name: "Downtown Crossing Station",
                category: TransitCategory::Subway,
                icon: &ICONS.red_triangle,
            },
            TransitPoint {
                position: Position::new(42.3550, -71.0605),
                name: "South Station",
                category: TransitCategory::Train,
                icon: &ICONS.blue_square,
            },
            TransitPoint {
                position: Position::new(42.3665, -71.0711),
                name: "Boston Common",
                category: TransitCategory::Park,
                icon: &ICONS.green_star,
            },
            TransitPoint {
                position: Position::new(42.3523, -71.0556),
                name: "Chinatown",
                category: TransitCategory::Neighborhood,
                icon: &ICONS.purple_circle,
            },
            TransitPoint {
                position: Position::new(42.3635, -71.0695),
                name: "Transit Hub",
                category: TransitCategory::Hub,
                icon: &ICONS.orange_triangle,
            },
        ],
    }
}

pub static SAMPLES: Lazy<SampleGeometry> = Lazy::new(build_samples);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_overlays_satisfy_constructors() {
        // The literal data must pass the same checks as the validating constructors
        assert!(Overlay::path(ROUTE_LINE.to_vec(), ROUTE_STYLE).is_ok());
        assert!(Overlay::area(PARK_AREA.to_vec(), PARK_STYLE).is_ok());
    }

    #[test]
    fn test_transit_points() {
        assert_eq!(SAMPLES.transit_points.len(), 5);
        assert!(SAMPLES.transit_points.iter().all(|p| p.position.is_valid()));
        let south = &SAMPLES.transit_points[1];
        assert_eq!(south.name, "South Station");
        assert_eq!(south.category, TransitCategory::Train);
        assert_eq!(*south.icon, ICONS.blue_square);
    }

    #[test]
    fn test_overlay_order() {
        let overlays = SAMPLES.overlays();
        assert!(matches!(overlays[0], Overlay::Path { .. }));
        assert!(matches!(overlays[1], Overlay::Area { .. }));
    }

    #[test]
    fn test_demo_circle_follows_center() {
        let center = Position::new(40.7128, -74.006);
        assert_eq!(
            demo_circle(center),
            Overlay::Circle {
                center,
                radius_m: 500.0,
                style: DEMO_CIRCLE_STYLE,
            }
        );
    }

    #[test]
    fn test_route_has_no_fill() {
        assert!(SAMPLES.route.style().fill.is_none());
        assert_eq!(SAMPLES.park.style().fill, Some("#00ff00"));
    }
}
