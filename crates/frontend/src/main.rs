mod components;
mod geolocation;
mod pages;
mod viewport;

use dioxus::prelude::*;
use transit_shared::config::MapConfig;
use transit_shared::styles::MapStyle;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/?:style")]
    Home { style: String },
}

#[component]
fn Home(style: String) -> Element {
    let config = use_hook(load_config);
    let initial_style = initial_style(&style, &config);
    rsx! {
        pages::explorer::Explorer { initial_style, config }
    }
}

/// Map settings embedded at build time, or the built-in defaults when they
/// fail to parse or validate.
fn load_config() -> MapConfig {
    match MapConfig::from_json(include_str!("../assets/config.json")) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "invalid map config, using defaults");
            MapConfig::default()
        }
    }
}

/// Style named by the `?style=` query parameter, falling back to the
/// configured one.
fn initial_style(query: &str, config: &MapConfig) -> MapStyle {
    if query.is_empty() {
        return config.initial_style;
    }
    match query.parse::<MapStyle>() {
        Ok(style) => style,
        Err(err) => {
            tracing::warn!(error = %err, fallback = %config.initial_style, "ignoring style query parameter");
            config.initial_style
        }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::init(dioxus::logger::tracing::Level::INFO).expect("failed to init logger");
    launch(App);
}
