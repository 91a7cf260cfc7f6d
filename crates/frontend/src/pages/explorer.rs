use dioxus::prelude::*;
use transit_shared::config::MapConfig;
use transit_shared::scene::build_scene;
use transit_shared::styles::MapStyle;

use crate::components::location_panel::LocationPanel;
use crate::components::map_view::MapView;
use crate::components::navbar::Navbar;
use crate::components::sidebar::Sidebar;
use crate::components::style_selector::StyleSelector;
use crate::geolocation::use_geolocation;

#[component]
pub fn Explorer(initial_style: MapStyle, config: MapConfig) -> Element {
    let menu_open = use_signal(|| false);
    let selected_style = use_signal(|| initial_style);
    let geolocator = use_geolocation(config.geolocation);

    // Rebuilt whenever the style or the stored fix changes
    let scene_config = config.clone();
    let scene = use_memo(move || {
        let tracker = geolocator.state.read();
        build_scene(*selected_style.read(), tracker.location(), &scene_config)
    });
    let fix_count = use_memo(move || geolocator.state.read().fix_count());

    rsx! {
        div { class: "app",
            Navbar { menu_open }
            Sidebar { open: menu_open }

            main { class: "map-page",
                MapView {
                    scene: scene,
                    fix_count: fix_count,
                    min_zoom: config.min_zoom,
                    max_zoom: config.max_zoom,
                }
                LocationPanel { geolocator }
                StyleSelector { selected_style }
            }
        }
    }
}
