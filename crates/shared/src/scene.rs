//! The map's render contract.
//!
//! [`build_scene`] is a pure function of the selected style, the current fix
//! and the config. The frontend re-runs it whenever one of those changes and
//! draws the result; nothing in a `MapScene` depends on the viewport.

use chrono::DateTime;

use crate::config::MapConfig;
use crate::geo::Position;
use crate::icons::{IconDescriptor, ICONS};
use crate::models::{Overlay, OverlayStyle, UserLocation};
use crate::samples::{demo_circle, SAMPLES};
use crate::styles::MapStyle;

pub const ACCURACY_STYLE: OverlayStyle = OverlayStyle::filled("#4CAF50", 1.0, "#4CAF50", 0.1);

/// Radius drawn when the platform reports no accuracy.
pub const FALLBACK_ACCURACY_M: f64 = 10.0;

pub const LOCATE_HINT: &str = "Click \"My Location\" to find your position";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayerSpec {
    pub style: MapStyle,
    pub url_template: &'static str,
    pub attribution: &'static str,
}

impl TileLayerSpec {
    pub fn for_style(style: MapStyle) -> Self {
        let d = style.descriptor();
        Self {
            style,
            url_template: d.url_template,
            attribution: d.attribution,
        }
    }
}

/// Stable identity of a marker across scene rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerId {
    User,
    Reference,
    Transit(usize),
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerId::User => write!(f, "user"),
            MarkerId::Reference => write!(f, "reference"),
            MarkerId::Transit(i) => write!(f, "transit-{i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
    /// Small print under the body.
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    pub id: MarkerId,
    pub position: Position,
    pub icon: &'static IconDescriptor,
    pub popup: Popup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTarget {
    pub center: Position,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub tile_layer: TileLayerSpec,
    /// Back to front.
    pub overlays: Vec<Overlay>,
    /// Back to front.
    pub markers: Vec<SceneMarker>,
    pub view: ViewTarget,
}

impl MapScene {
    pub fn marker(&self, id: MarkerId) -> Option<&SceneMarker> {
        self.markers.iter().find(|m| m.id == id)
    }
}

pub fn build_scene(style: MapStyle, location: Option<&UserLocation>, config: &MapConfig) -> MapScene {
    let mut overlays = Vec::with_capacity(4);
    let mut markers = Vec::with_capacity(SAMPLES.transit_points.len() + 2);

    if let Some(loc) = location {
        overlays.push(accuracy_circle(loc));
        markers.push(SceneMarker {
            id: MarkerId::User,
            position: loc.position,
            icon: &ICONS.user_location,
            popup: user_popup(loc),
        });
    }

    markers.push(SceneMarker {
        id: MarkerId::Reference,
        position: config.reference_point,
        icon: &ICONS.default_marker,
        popup: reference_popup(config, style, location.is_some()),
    });

    overlays.extend(SAMPLES.overlays().into_iter().cloned());
    overlays.push(demo_circle(config.reference_point));

    for (i, point) in SAMPLES.transit_points.iter().enumerate() {
        markers.push(SceneMarker {
            id: MarkerId::Transit(i),
            position: point.position,
            icon: point.icon,
            popup: Popup {
                title: point.name.to_string(),
                lines: vec![
                    format!("Type: {}", point.category),
                    format!(
                        "Coordinates: {:.4}, {:.4}",
                        point.position.latitude, point.position.longitude
                    ),
                ],
                hint: None,
            },
        });
    }

    MapScene {
        tile_layer: TileLayerSpec::for_style(style),
        overlays,
        markers,
        view: view_target(location, config),
    }
}

/// Where the map should be centered for the given fix.
pub fn view_target(location: Option<&UserLocation>, config: &MapConfig) -> ViewTarget {
    match location {
        Some(loc) => ViewTarget {
            center: loc.position,
            zoom: config.located_zoom,
        },
        None => ViewTarget {
            center: config.reference_point,
            zoom: config.default_zoom,
        },
    }
}

pub fn accuracy_circle(loc: &UserLocation) -> Overlay {
    Overlay::circle(
        loc.position,
        loc.accuracy.unwrap_or(FALLBACK_ACCURACY_M),
        ACCURACY_STYLE,
    )
}

/// Accuracy rounded to whole meters, zero when unknown.
pub fn rounded_accuracy(loc: &UserLocation) -> i64 {
    loc.accuracy.unwrap_or(0.0).round() as i64
}

fn user_popup(loc: &UserLocation) -> Popup {
    let lat = loc.position.latitude;
    let lng = loc.position.longitude;
    let mut lines = vec![
        format!("Lat: {lat:.6}"),
        format!("Lng: {lng:.6}"),
        format!("Coordinates: {lat:.6}, {lng:.6}"),
        format!("Accuracy: \u{00b1}{} meters", rounded_accuracy(loc)),
    ];
    if let Some(time) = loc.timestamp_ms.and_then(format_fix_time) {
        lines.push(format!("Time: {time}"));
    }
    Popup {
        title: "Your Location".to_string(),
        lines,
        hint: None,
    }
}

fn reference_popup(config: &MapConfig, style: MapStyle, located: bool) -> Popup {
    Popup {
        title: config.reference_name.clone(),
        lines: vec![
            config.welcome_line.clone(),
            format!("Current Style: {}", style.display_name()),
        ],
        hint: (!located).then(|| LOCATE_HINT.to_string()),
    }
}

/// Format a fix timestamp (ms since epoch) as wall-clock UTC time.
pub fn format_fix_time(timestamp_ms: f64) -> Option<String> {
    let dt = DateTime::from_timestamp_millis(timestamp_ms as i64)?;
    Some(dt.format("%H:%M:%S UTC").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boston_fix() -> UserLocation {
        UserLocation {
            position: Position::new(42.36, -71.06),
            accuracy: Some(15.0),
            timestamp_ms: None,
        }
    }

    #[test]
    fn test_scene_without_location() {
        let config = MapConfig::default();
        let scene = build_scene(MapStyle::CartoVoyager, None, &config);
        assert!(scene.marker(MarkerId::User).is_none());
        assert_eq!(scene.markers.len(), 6);
        assert_eq!(scene.overlays.len(), 3);
        assert_eq!(scene.view.center, config.reference_point);
        assert_eq!(scene.view.zoom, 13);
        let reference = scene.marker(MarkerId::Reference).unwrap();
        assert_eq!(reference.popup.title, "Boston, MA");
        assert_eq!(reference.popup.hint.as_deref(), Some(LOCATE_HINT));
    }

    #[test]
    fn test_scene_with_location() {
        let config = MapConfig::default();
        let loc = boston_fix();
        let scene = build_scene(MapStyle::CartoVoyager, Some(&loc), &config);
        assert_eq!(scene.markers.len(), 7);
        assert_eq!(scene.overlays.len(), 4);
        assert_eq!(scene.view.center, loc.position);
        assert_eq!(scene.view.zoom, 15);

        // Accuracy circle first so it draws beneath the demo shapes
        match &scene.overlays[0] {
            Overlay::Circle { center, radius_m, style } => {
                assert_eq!(*center, loc.position);
                assert_eq!(*radius_m, 15.0);
                assert_eq!(*style, ACCURACY_STYLE);
            }
            other => panic!("expected accuracy circle, got {other:?}"),
        }

        let user = scene.marker(MarkerId::User).unwrap();
        assert_eq!(*user.icon, ICONS.user_location);
        assert_eq!(user.popup.title, "Your Location");
        assert!(user.popup.lines.contains(&"Coordinates: 42.360000, -71.060000".to_string()));
        assert!(user.popup.lines.contains(&"Lat: 42.360000".to_string()));
        assert!(user.popup.lines.contains(&"Accuracy: \u{00b1}15 meters".to_string()));

        let reference = scene.marker(MarkerId::Reference).unwrap();
        assert!(reference.popup.hint.is_none());
    }

    #[test]
    fn test_missing_accuracy_falls_back() {
        let loc = UserLocation {
            accuracy: None,
            ..boston_fix()
        };
        assert!(matches!(
            accuracy_circle(&loc),
            Overlay::Circle { radius_m, .. } if radius_m == FALLBACK_ACCURACY_M
        ));
        assert_eq!(rounded_accuracy(&loc), 0);
    }

    #[test]
    fn test_accuracy_rounding() {
        let loc = UserLocation {
            accuracy: Some(12.5),
            ..boston_fix()
        };
        assert_eq!(rounded_accuracy(&loc), 13);
    }

    #[test]
    fn test_popup_includes_time_when_known() {
        let loc = UserLocation {
            timestamp_ms: Some(1_700_000_000_000.0),
            ..boston_fix()
        };
        let scene = build_scene(MapStyle::Osm, Some(&loc), &MapConfig::default());
        let user = scene.marker(MarkerId::User).unwrap();
        assert_eq!(user.popup.lines.last().unwrap(), "Time: 22:13:20 UTC");
    }

    #[test]
    fn test_style_switch_only_changes_tiles_and_style_line() {
        let config = MapConfig::default();
        let loc = boston_fix();
        let a = build_scene(MapStyle::CartoVoyager, Some(&loc), &config);
        let b = build_scene(MapStyle::EsriWorld, Some(&loc), &config);

        assert_ne!(a.tile_layer.url_template, b.tile_layer.url_template);
        assert_ne!(a.tile_layer.attribution, b.tile_layer.attribution);
        assert_eq!(a.overlays, b.overlays);
        assert_eq!(a.view, b.view);
        assert_eq!(a.markers.len(), b.markers.len());
        for (ma, mb) in a.markers.iter().zip(&b.markers) {
            assert_eq!(ma.id, mb.id);
            assert_eq!(ma.position, mb.position);
            assert_eq!(ma.icon, mb.icon);
            if ma.id != MarkerId::Reference {
                assert_eq!(ma.popup, mb.popup);
            }
        }
        let line = &b.marker(MarkerId::Reference).unwrap().popup.lines[1];
        assert_eq!(line, "Current Style: Esri World Street");
    }

    #[test]
    fn test_transit_popups() {
        let scene = build_scene(MapStyle::Osm, None, &MapConfig::default());
        let first = scene.marker(MarkerId::Transit(0)).unwrap();
        assert_eq!(first.popup.title, "Downtown Crossing Station");
        assert_eq!(
            first.popup.lines,
            vec![
                "Type: subway".to_string(),
                "Coordinates: 42.3584, -71.0638".to_string()
            ]
        );
        assert_eq!(*first.icon, ICONS.red_triangle);
    }

    #[test]
    fn test_marker_ids_unique() {
        let scene = build_scene(MapStyle::Osm, Some(&boston_fix()), &MapConfig::default());
        let mut ids: Vec<String> = scene.markers.iter().map(|m| m.id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), scene.markers.len());
    }

    #[test]
    fn test_moved_reference_point_moves_demo_circle() {
        let config = MapConfig::from_json(
            r#"{"referencePoint":{"latitude":40.7128,"longitude":-74.006},"referenceName":"New York, NY"}"#,
        )
        .unwrap();
        let scene = build_scene(MapStyle::Osm, None, &config);

        let reference = scene.marker(MarkerId::Reference).unwrap();
        assert_eq!(reference.position, config.reference_point);
        assert_eq!(reference.popup.title, "New York, NY");
        assert_eq!(scene.view.center, config.reference_point);
        match scene.overlays.last().unwrap() {
            Overlay::Circle { center, radius_m, .. } => {
                assert_eq!(*center, config.reference_point);
                assert_eq!(*radius_m, 500.0);
            }
            other => panic!("expected demo circle, got {other:?}"),
        }
    }

    #[test]
    fn test_build_scene_is_pure() {
        let config = MapConfig::default();
        let loc = boston_fix();
        assert_eq!(
            build_scene(MapStyle::CartoLight, Some(&loc), &config),
            build_scene(MapStyle::CartoLight, Some(&loc), &config)
        );
    }
}
