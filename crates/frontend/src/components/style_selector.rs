use dioxus::prelude::*;
use transit_shared::styles::MapStyle;

#[component]
pub fn StyleSelector(selected_style: Signal<MapStyle>) -> Element {
    let current = *selected_style.read();

    rsx! {
        div { class: "floating-panel style-panel",
            label { r#for: "map-style-select", "Map Style" }
            select {
                id: "map-style-select",
                "aria-label": "Select map style",
                value: "{current.key()}",
                onchange: move |evt: Event<FormData>| {
                    match evt.value().parse::<MapStyle>() {
                        Ok(style) => {
                            tracing::info!(style = %style, "map style changed");
                            selected_style.set(style);
                        }
                        Err(err) => tracing::error!(error = %err, "ignoring style selection"),
                    }
                },
                for style in MapStyle::ALL {
                    option {
                        value: "{style.key()}",
                        selected: style == current,
                        "{style.display_name()}"
                    }
                }
            }
        }
    }
}
