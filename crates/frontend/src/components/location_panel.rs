use dioxus::prelude::*;
use transit_shared::scene::rounded_accuracy;

use crate::geolocation::Geolocator;

#[component]
pub fn LocationPanel(geolocator: Geolocator) -> Element {
    let (locating, error, readout) = {
        let tracker = geolocator.state.read();
        let readout = tracker.location().map(|loc| {
            (
                format!("{:.6}", loc.position.latitude),
                format!("{:.6}", loc.position.longitude),
                rounded_accuracy(loc),
            )
        });
        (tracker.is_locating(), tracker.error().map(|e| e.to_string()), readout)
    };

    rsx! {
        div { class: "floating-panel location-panel",
            button {
                class: "locate-button",
                disabled: locating,
                onclick: move |_| geolocator.locate(),
                if locating {
                    span { class: "spinner" }
                    "Locating..."
                } else {
                    span { class: "pin" }
                    "My Location"
                }
            }

            if let Some(message) = error {
                div { class: "location-error", "{message}" }
            }

            if let Some((lat, lng, accuracy)) = readout {
                div { class: "location-readout",
                    div { "Lat: {lat}" }
                    div { "Lng: {lng}" }
                    div { "Accuracy: \u{00b1}{accuracy}m" }
                }
            }
        }
    }
}
