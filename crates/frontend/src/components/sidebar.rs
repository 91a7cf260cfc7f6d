use dioxus::prelude::*;

/// Slide-in options panel. The controls are placeholders and do not affect
/// the map.
#[component]
pub fn Sidebar(open: Signal<bool>) -> Element {
    let class = if *open.read() { "sidebar open" } else { "sidebar" };

    rsx! {
        aside { class: "{class}",
            div { class: "sidebar-header",
                h2 { "Map Options" }
                button {
                    class: "sidebar-close",
                    "aria-label": "Close menu",
                    onclick: move |_| open.set(false),
                    "\u{00d7}"
                }
            }

            div { class: "sidebar-section",
                h3 { "Layers" }
                label { input { r#type: "checkbox", checked: true } span { "Train Routes" } }
                label { input { r#type: "checkbox", checked: true } span { "Bus Routes" } }
                label { input { r#type: "checkbox" } span { "Stops" } }
            }

            div { class: "sidebar-section",
                h3 { "Display Options" }
                label { class: "field-label", "Map Style" }
                select {
                    option { "Standard" }
                    option { "Satellite" }
                    option { "Terrain" }
                }
                label { class: "field-label", "Zoom Level" }
                input { r#type: "range", min: "1", max: "18", value: "13" }
            }

            div { class: "sidebar-section",
                h3 { "Data Sources" }
                button { class: "primary", "Refresh Data" }
                button { class: "success", "Load MBTA Routes" }
            }
        }

        if *open.read() {
            div {
                class: "sidebar-backdrop",
                onclick: move |_| open.set(false),
            }
        }
    }
}
