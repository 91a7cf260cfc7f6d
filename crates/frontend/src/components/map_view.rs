use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use transit_shared::geo::Position;
use transit_shared::models::{Overlay, OverlayStyle};
use transit_shared::scene::{MapScene, MarkerId};
use transit_shared::styles::expand_tile_url;

use crate::viewport::{self, Viewport};

const MAP_CONTAINER_ID: &str = "transit-map-container";

/// Mouse movement below this many pixels is a click, not a drag.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch movement below this many pixels is a tap.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Accumulated wheel distance that equals one zoom level.
const WHEEL_STEP: f64 = 100.0;

/// Finger distance ratio that equals one zoom level.
const PINCH_STEP_RATIO: f64 = 1.5;

// ---------------------------------------------------------------------------
// Zoom helpers (pure functions, easily testable)
// ---------------------------------------------------------------------------

/// Center and zoom after stepping `step` levels around container pixel
/// `(x, y)`. `None` when the zoom is already at the bound in that direction.
fn zoom_around(
    vp: &Viewport,
    step: i32,
    min_zoom: u8,
    max_zoom: u8,
    x: f64,
    y: f64,
) -> Option<(Position, u8)> {
    let new_zoom = (vp.zoom as i32 + step).clamp(min_zoom as i32, max_zoom as i32) as u8;
    if new_zoom == vp.zoom {
        return None;
    }
    Some((vp.zoomed_center(new_zoom, x, y), new_zoom))
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Zoom levels represented by the change in finger distance since the last step.
fn pinch_step(start_distance: f64, distance: f64) -> i32 {
    if start_distance < 1.0 {
        return 0;
    }
    let ratio = distance / start_distance;
    if ratio >= PINCH_STEP_RATIO {
        1
    } else if ratio <= 1.0 / PINCH_STEP_RATIO {
        -1
    } else {
        0
    }
}

/// Distance between two client-coordinate points (for touch threshold checks).
fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

// ---------------------------------------------------------------------------
// SVG overlay builders
// ---------------------------------------------------------------------------

fn build_overlay_svg(overlays: &[Overlay], vp: &Viewport) -> String {
    let mut shapes = String::with_capacity(2048);
    for overlay in overlays {
        match overlay {
            Overlay::Path { points, style } => {
                shapes.push_str(&format!(
                    r#"<polyline points="{}" {}/>"#,
                    screen_points(points, vp),
                    paint_attrs(style)
                ));
            }
            Overlay::Area { points, style } => {
                shapes.push_str(&format!(
                    r#"<polygon points="{}" {}/>"#,
                    screen_points(points, vp),
                    paint_attrs(style)
                ));
            }
            Overlay::Circle {
                center,
                radius_m,
                style,
            } => {
                let (cx, cy) = vp.to_screen(*center);
                let r = vp.meters_to_px(*radius_m, center.latitude);
                shapes.push_str(&format!(
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" {}/>"#,
                    paint_attrs(style)
                ));
            }
        }
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="position:absolute;top:0;left:0;pointer-events:none;">{shapes}</svg>"#,
        w = vp.width,
        h = vp.height,
    )
}

fn screen_points(points: &[Position], vp: &Viewport) -> String {
    points
        .iter()
        .map(|p| {
            let (x, y) = vp.to_screen(*p);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint_attrs(style: &OverlayStyle) -> String {
    let fill = match style.fill {
        Some(color) => format!(r#"fill="{color}" fill-opacity="{}""#, style.fill_opacity),
        None => r#"fill="none""#.to_string(),
    };
    format!(
        r#"stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="round" stroke-linejoin="round" {fill}"#,
        style.stroke, style.weight, style.stroke_opacity
    )
}

/// A marker image positioned by its icon anchor.
#[derive(Debug, Clone, PartialEq)]
struct PlacedMarker {
    id: MarkerId,
    src: String,
    title: String,
    left: f64,
    top: f64,
    width: u32,
    height: u32,
}

fn place_markers(scene: &MapScene, vp: &Viewport) -> Vec<PlacedMarker> {
    scene
        .markers
        .iter()
        .map(|m| {
            let (x, y) = vp.to_screen(m.position);
            PlacedMarker {
                id: m.id,
                src: m.icon.image_source.clone(),
                title: m.popup.title.clone(),
                left: x - m.icon.anchor.0 as f64,
                top: y - m.icon.anchor.1 as f64,
                width: m.icon.size.0,
                height: m.icon.size.1,
            }
        })
        .collect()
}

/// Container pixel where the popup's tip points for marker `id`.
fn popup_tip(scene: &MapScene, vp: &Viewport, id: MarkerId) -> Option<(f64, f64)> {
    let marker = scene.marker(id)?;
    let (x, y) = vp.to_screen(marker.position);
    Some((
        x + marker.icon.popup_anchor.0 as f64,
        y + marker.icon.popup_anchor.1 as f64,
    ))
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    scene: ReadSignal<MapScene>,
    fix_count: ReadSignal<u64>,
    min_zoom: u8,
    max_zoom: u8,
) -> Element {
    let mut center = use_signal(|| scene.peek().view.center);
    let mut zoom = use_signal(|| scene.peek().view.zoom);
    let mut size = use_signal(|| None::<(f64, f64)>);
    let mut open_popup = use_signal(|| None::<MarkerId>);

    // Re-center on every successful fix; style switches leave the view alone
    use_effect(move || {
        let _fixes = *fix_count.read();
        let target = scene.peek().view;
        center.set(target.center);
        zoom.set(target.zoom);
    });

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_center = use_signal(|| Position::new(0.0, 0.0));

    // Touch state
    let mut touch_start_pos = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);
    let mut touch_start_center = use_signal(|| Position::new(0.0, 0.0));
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);

    let mut wheel_accum = use_signal(|| 0.0_f64);

    let current_viewport = move || -> Option<Viewport> {
        let (w, h) = (*size.read())?;
        Some(Viewport::new(*center.read(), *zoom.read(), w, h))
    };

    let mut zoom_by = move |step: i32, x: f64, y: f64| {
        let Some(vp) = current_viewport() else { return };
        if let Some((c, z)) = zoom_around(&vp, step, min_zoom, max_zoom, x, y) {
            center.set(c);
            zoom.set(z);
        }
    };

    let mut measure = move || {
        let Some(rect) = viewport::element_rect(MAP_CONTAINER_ID) else {
            return;
        };
        let next = (rect.width(), rect.height());
        if next.0 > 0.0 && next.1 > 0.0 && *size.peek() != Some(next) {
            tracing::debug!(width = next.0, height = next.1, "map container measured");
            size.set(Some(next));
        }
    };

    let dragging = *is_dragging.read();
    let container_class = if dragging {
        "map-container dragging"
    } else {
        "map-container"
    };

    let content = match current_viewport() {
        None => rsx! {
            div { class: "map-loading", "Loading map..." }
        },
        Some(vp) => {
            let scene_ref = scene.read();
            let layer = scene_ref.tile_layer;
            let tiles: Vec<(String, String, f64, f64)> = vp
                .visible_tiles()
                .into_iter()
                .map(|t| {
                    (t.key(), expand_tile_url(layer.url_template, t.coord), t.left, t.top)
                })
                .collect();
            let svg_html = build_overlay_svg(&scene_ref.overlays, &vp);
            let markers = place_markers(&scene_ref, &vp);

            let popup = open_popup.read().and_then(|id| {
                let tip = popup_tip(&scene_ref, &vp, id)?;
                let popup = scene_ref.marker(id)?.popup.clone();
                Some((tip, popup))
            });

            let cur_zoom = vp.zoom;

            rsx! {
                div { class: "map-tiles",
                    for (key, src, left, top) in tiles {
                        img {
                            key: "{key}",
                            class: "map-tile",
                            src: "{src}",
                            alt: "",
                            draggable: "false",
                            style: "left:{left}px;top:{top}px;",
                        }
                    }
                }

                div {
                    class: "map-overlays",
                    dangerous_inner_html: "{svg_html}",
                }

                div { class: "map-markers",
                    for m in markers {
                        img {
                            key: "{m.id}",
                            class: "map-marker",
                            src: "{m.src}",
                            alt: "{m.title}",
                            title: "{m.title}",
                            draggable: "false",
                            style: "left:{m.left}px;top:{m.top}px;width:{m.width}px;height:{m.height}px;",
                            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                            ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                            ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                            onclick: move |evt: Event<MouseData>| {
                                evt.stop_propagation();
                                open_popup.set(Some(m.id));
                            },
                        }
                    }
                }

                {popup.map(|((x, y), popup)| rsx! {
                    div {
                        class: "map-popup",
                        style: "left:{x}px;top:{y}px;",
                        onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                        ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                        ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                        ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                        button {
                            class: "map-popup-close",
                            "aria-label": "Close popup",
                            onclick: move |_| open_popup.set(None),
                            "\u{00d7}"
                        }
                        strong { "{popup.title}" }
                        for line in popup.lines {
                            div { class: "map-popup-line", "{line}" }
                        }
                        {popup.hint.map(|hint| rsx! {
                            small { class: "map-popup-hint", "{hint}" }
                        })}
                    }
                })}

                div {
                    class: "map-zoom-control",
                    onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                    ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                    ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                    ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                    button {
                        "aria-label": "Zoom in",
                        disabled: cur_zoom >= max_zoom,
                        onclick: move |_| zoom_by(1, vp.width / 2.0, vp.height / 2.0),
                        "+"
                    }
                    button {
                        "aria-label": "Zoom out",
                        disabled: cur_zoom <= min_zoom,
                        onclick: move |_| zoom_by(-1, vp.width / 2.0, vp.height / 2.0),
                        "\u{2212}"
                    }
                }

                div {
                    class: "map-attribution",
                    onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                    ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                    ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                    dangerous_inner_html: "{layer.attribution}",
                }
            }
        }
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_evt: Event<MountedData>| measure(),
            onresize: move |_evt: Event<ResizeData>| measure(),

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let Some(rect) = viewport::element_rect(MAP_CONTAINER_ID) else { return };

                let total = *wheel_accum.read() + wheel_delta_y(evt.data().delta());
                if total.abs() < WHEEL_STEP {
                    wheel_accum.set(total);
                    return;
                }
                wheel_accum.set(0.0);

                let client = evt.data().client_coordinates();
                let (x, y) = viewport::client_to_container(client.x, client.y, rect.left(), rect.top());
                let step = if total < 0.0 { 1 } else { -1 };
                zoom_by(step, x, y);
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_center.set(*center.read());
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    if let Some(vp) = current_viewport() {
                        let start = Viewport { center: *drag_start_center.read(), ..vp };
                        center.set(start.panned_center(dx, dy));
                    }
                }
            },

            onmouseup: move |_evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click on the map
                if was_dragging && !was_drag {
                    open_popup.set(None);
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                let Some(rect) = viewport::element_rect(MAP_CONTAINER_ID) else { return };
                let client = evt.client_coordinates();
                let (x, y) = viewport::client_to_container(client.x, client.y, rect.left(), rect.top());
                zoom_by(1, x, y);
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    // Single finger: record start position for tap detection and panning
                    let t = &touches[0];
                    touch_start_pos.set(Some((t.client_coordinates().x, t.client_coordinates().y)));
                    touch_did_pan.set(false);
                    touch_start_center.set(*center.read());
                } else if touches.len() >= 2 {
                    // Two fingers: start pinch-to-zoom
                    let p0 = (touches[0].client_coordinates().x, touches[0].client_coordinates().y);
                    let p1 = (touches[1].client_coordinates().x, touches[1].client_coordinates().y);
                    is_pinching.set(true);
                    pinch_start_distance.set(point_distance(p0, p1));
                    // Cancel any tap tracking
                    touch_start_pos.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();

                if *is_pinching.read() && touches.len() >= 2 {
                    let p0 = (touches[0].client_coordinates().x, touches[0].client_coordinates().y);
                    let p1 = (touches[1].client_coordinates().x, touches[1].client_coordinates().y);
                    let d = point_distance(p0, p1);
                    let step = pinch_step(*pinch_start_distance.read(), d);
                    if step == 0 {
                        return;
                    }
                    pinch_start_distance.set(d);

                    // Zoom around the pinch midpoint
                    let Some(rect) = viewport::element_rect(MAP_CONTAINER_ID) else { return };
                    let (x, y) = viewport::client_to_container(
                        (p0.0 + p1.0) / 2.0,
                        (p0.1 + p1.1) / 2.0,
                        rect.left(),
                        rect.top(),
                    );
                    zoom_by(step, x, y);
                } else if touches.len() == 1 {
                    // Single finger pan
                    let t = &touches[0];
                    let cur = (t.client_coordinates().x, t.client_coordinates().y);
                    if let Some(start) = *touch_start_pos.read() {
                        if !*touch_did_pan.read() && point_distance(start, cur) > TOUCH_DRAG_THRESHOLD {
                            touch_did_pan.set(true);
                        }
                        if *touch_did_pan.read() {
                            if let Some(vp) = current_viewport() {
                                let origin = Viewport { center: *touch_start_center.read(), ..vp };
                                center.set(origin.panned_center(cur.0 - start.0, cur.1 - start.1));
                            }
                        }
                    }
                }
            },

            // Children that handle clicks stop touchend here, or cancelling it
            // would swallow their synthesized click
            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let remaining = evt.data().touches().len();

                if *is_pinching.read() {
                    // Wait for all fingers to lift before resetting pinch state
                    if remaining == 0 {
                        is_pinching.set(false);
                        touch_start_pos.set(None);
                    }
                    return;
                }

                // Single-finger tap on the map closes the popup
                if remaining == 0 && !*touch_did_pan.read() && touch_start_pos.read().is_some() {
                    open_popup.set(None);
                }

                if remaining == 0 {
                    touch_start_pos.set(None);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                // Reset all touch state
                touch_start_pos.set(None);
                touch_did_pan.set(false);
                is_pinching.set(false);
            },

            {content}
        }
    }
}
