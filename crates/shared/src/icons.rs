//! Marker icons rendered from small SVG glyph templates.
//!
//! Every icon is a pure function of `(color, shape)`: the glyph is templated
//! with the color and wrapped in a `data:` URI, while size and anchors come
//! from a fixed per-shape table.

use once_cell::sync::Lazy;

pub const DEFAULT_COLOR: &str = "#3388ff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconShape {
    Triangle,
    Square,
    Star,
    User,
    Default,
}

impl IconShape {
    /// Parse a shape tag. Unrecognized tags fall back to [`IconShape::Default`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "triangle" => IconShape::Triangle,
            "square" => IconShape::Square,
            "star" => IconShape::Star,
            "user" => IconShape::User,
            _ => IconShape::Default,
        }
    }

    fn geometry(self) -> IconGeometry {
        match self {
            // Tip of the triangle sits on the point
            IconShape::Triangle => IconGeometry {
                size: (32, 32),
                anchor: (16, 32),
                popup_anchor: (0, -32),
            },
            IconShape::Square | IconShape::Star | IconShape::Default => IconGeometry {
                size: (32, 32),
                anchor: (16, 16),
                popup_anchor: (0, -16),
            },
            IconShape::User => IconGeometry {
                size: (24, 24),
                anchor: (12, 12),
                popup_anchor: (0, -12),
            },
        }
    }

    fn glyph(self, color: &str) -> String {
        match self {
            IconShape::Triangle => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="32" height="32"><path d="M12 2 L22 20 L2 20 Z" fill="{color}" stroke="white" stroke-width="2"/><circle cx="12" cy="14" r="3" fill="white"/></svg>"#
            ),
            IconShape::Square => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="32" height="32"><rect x="4" y="4" width="16" height="16" fill="{color}" stroke="white" stroke-width="2"/><circle cx="12" cy="12" r="3" fill="white"/></svg>"#
            ),
            IconShape::Star => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="32" height="32"><path d="M12 2 L15.09 8.26 L22 9.27 L17 14.14 L18.18 21.02 L12 17.77 L5.82 21.02 L7 14.14 L2 9.27 L8.91 8.26 Z" fill="{color}" stroke="white" stroke-width="1"/></svg>"#
            ),
            IconShape::User => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24"><circle cx="12" cy="12" r="8" fill="{color}" fill-opacity="0.3"/><circle cx="12" cy="12" r="5" fill="{color}" fill-opacity="0.7"/><circle cx="12" cy="12" r="2" fill="{color}"/></svg>"#
            ),
            IconShape::Default => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="32" height="32"><circle cx="12" cy="12" r="10" fill="{color}" stroke="white" stroke-width="2"/><circle cx="12" cy="12" r="4" fill="white"/></svg>"#
            ),
        }
    }
}

struct IconGeometry {
    size: (u32, u32),
    anchor: (i32, i32),
    popup_anchor: (i32, i32),
}

/// Everything needed to place a marker image on the map.
///
/// `anchor` is the pixel of the image that sits on the marker position;
/// `popup_anchor` is relative to that anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconDescriptor {
    pub image_source: String,
    pub size: (u32, u32),
    pub anchor: (i32, i32),
    pub popup_anchor: (i32, i32),
}

pub fn create_icon(color: &str, shape: IconShape) -> IconDescriptor {
    let geometry = shape.geometry();
    let svg = shape.glyph(&escape_attr(color));
    IconDescriptor {
        image_source: svg_data_uri(&svg),
        size: geometry.size,
        anchor: geometry.anchor,
        popup_anchor: geometry.popup_anchor,
    }
}

/// Same as [`create_icon`] but takes the shape as a free-form tag.
pub fn create_icon_from_tag(color: &str, tag: &str) -> IconDescriptor {
    create_icon(color, IconShape::from_tag(tag))
}

/// The named icons used by the map.
pub struct IconSet {
    pub red_triangle: IconDescriptor,
    pub blue_square: IconDescriptor,
    pub green_star: IconDescriptor,
    pub purple_circle: IconDescriptor,
    pub orange_triangle: IconDescriptor,
    pub user_location: IconDescriptor,
    /// Plain marker for points without a custom icon.
    pub default_marker: IconDescriptor,
}

pub static ICONS: Lazy<IconSet> = Lazy::new(|| IconSet {
    red_triangle: create_icon("#ff0000", IconShape::Triangle),
    blue_square: create_icon("#0066cc", IconShape::Square),
    green_star: create_icon("#00aa00", IconShape::Star),
    purple_circle: create_icon("#9900cc", IconShape::Default),
    orange_triangle: create_icon("#ff6600", IconShape::Triangle),
    user_location: create_icon("#4CAF50", IconShape::User),
    default_marker: create_icon(DEFAULT_COLOR, IconShape::Default),
});

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap SVG markup in a `data:` URI, percent-encoding the characters that
/// are unsafe inside a URL or an HTML attribute.
fn svg_data_uri(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len() + 32);
    out.push_str("data:image/svg+xml;charset=utf-8,");
    for c in svg.chars() {
        match c {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '"' => out.push_str("%22"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '\n' | '\r' | '\t' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: [IconShape; 5] = [
        IconShape::Triangle,
        IconShape::Square,
        IconShape::Star,
        IconShape::User,
        IconShape::Default,
    ];

    #[test]
    fn test_geometry_table_independent_of_color() {
        for shape in SHAPES {
            let a = create_icon("#ff0000", shape);
            let b = create_icon("rgb(1, 2, 3)", shape);
            assert_eq!(a.size, b.size);
            assert_eq!(a.anchor, b.anchor);
            assert_eq!(a.popup_anchor, b.popup_anchor);
        }
    }

    #[test]
    fn test_triangle_anchored_center_bottom() {
        let icon = create_icon(DEFAULT_COLOR, IconShape::Triangle);
        assert_eq!(icon.size, (32, 32));
        assert_eq!(icon.anchor, (16, 32));
        assert_eq!(icon.popup_anchor, (0, -32));
    }

    #[test]
    fn test_centered_shapes() {
        for shape in [IconShape::Square, IconShape::Star, IconShape::Default] {
            let icon = create_icon(DEFAULT_COLOR, shape);
            assert_eq!(icon.size, (32, 32));
            assert_eq!(icon.anchor, (16, 16));
            assert_eq!(icon.popup_anchor, (0, -16));
        }
    }

    #[test]
    fn test_user_icon_is_smaller() {
        let icon = create_icon("#4CAF50", IconShape::User);
        assert_eq!(icon.size, (24, 24));
        assert_eq!(icon.anchor, (12, 12));
        assert_eq!(icon.popup_anchor, (0, -12));
    }

    #[test]
    fn test_unknown_tag_matches_default() {
        assert_eq!(
            create_icon_from_tag("#123456", "hexagon"),
            create_icon("#123456", IconShape::Default)
        );
        assert_eq!(
            create_icon_from_tag("#123456", ""),
            create_icon_from_tag("#123456", "default")
        );
    }

    #[test]
    fn test_known_tags_parse() {
        assert_eq!(IconShape::from_tag("triangle"), IconShape::Triangle);
        assert_eq!(IconShape::from_tag("square"), IconShape::Square);
        assert_eq!(IconShape::from_tag("star"), IconShape::Star);
        assert_eq!(IconShape::from_tag("user"), IconShape::User);
        assert_eq!(IconShape::from_tag("Triangle"), IconShape::Default);
    }

    #[test]
    fn test_create_icon_is_deterministic() {
        for shape in SHAPES {
            assert_eq!(create_icon("#00aa00", shape), create_icon("#00aa00", shape));
        }
    }

    #[test]
    fn test_image_source_is_encoded_svg() {
        let icon = create_icon("#ff0000", IconShape::Square);
        assert!(icon.image_source.starts_with("data:image/svg+xml"));
        // Color is embedded, with '#' percent-encoded
        assert!(icon.image_source.contains("%23ff0000"));
        assert!(!icon.image_source.contains('<'));
        assert!(!icon.image_source.contains('"'));
    }

    #[test]
    fn test_color_cannot_break_out_of_attribute() {
        let icon = create_icon(r#"red" onload="x"#, IconShape::Default);
        assert!(icon.image_source.contains("&quot;"));
        assert!(!icon.image_source.contains("%22 onload"));
    }

    #[test]
    fn test_named_icons() {
        assert_eq!(ICONS.user_location.size, (24, 24));
        assert!(ICONS.red_triangle.image_source.contains("%23ff0000"));
        assert_eq!(ICONS.purple_circle.anchor, (16, 16));
        assert_ne!(ICONS.red_triangle, ICONS.orange_triangle);
    }
}
