use dioxus::prelude::*;
use js_sys::{Function, Promise, Reflect};
use transit_shared::geolocation::{GeolocationOptions, LocationError, LocationTracker};
use transit_shared::models::UserLocation;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Ask the browser for a single position fix.
pub async fn current_position(options: GeolocationOptions) -> Result<UserLocation, LocationError> {
    let Some(window) = web_sys::window() else {
        return Err(LocationError::Unsupported);
    };
    let navigator = window.navigator();
    // The getter hands back `undefined` instead of failing when the API is absent
    let has_api = Reflect::has(&navigator, &JsValue::from_str("geolocation")).unwrap_or(false);
    let geolocation = match navigator.geolocation() {
        Ok(geolocation) if has_api && !JsValue::from(geolocation.clone()).is_undefined() => {
            geolocation
        }
        _ => return Err(LocationError::Unsupported),
    };

    let position_options = web_sys::PositionOptions::new();
    position_options.set_enable_high_accuracy(options.high_accuracy);
    position_options.set_timeout(options.timeout_ms);
    position_options.set_maximum_age(options.maximum_age_ms);

    // Success and error callbacks become the promise's resolve/reject pair
    let mut sync_failure = None;
    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        if let Err(err) = geolocation.get_current_position_with_error_callback_and_options(
            &resolve,
            Some(&reject),
            &position_options,
        ) {
            sync_failure = Some(err);
        }
    });
    if let Some(err) = sync_failure {
        tracing::error!(error = ?err, "getCurrentPosition threw");
        return Err(LocationError::Unsupported);
    }

    match JsFuture::from(promise).await {
        Ok(value) => {
            let position: web_sys::Position = value.unchecked_into();
            let coords = position.coords();
            UserLocation::from_fix(
                coords.latitude(),
                coords.longitude(),
                Some(coords.accuracy()),
                Some(position.timestamp()),
            )
            .map_err(|err| {
                tracing::warn!(error = %err, "browser returned an invalid fix");
                LocationError::PositionUnavailable
            })
        }
        Err(err) => Err(error_kind(error_code(&err))),
    }
}

/// Read `code` off a `GeolocationPositionError` (or anything else thrown).
fn error_code(err: &JsValue) -> Option<f64> {
    Reflect::get(err, &JsValue::from_str("code")).ok()?.as_f64()
}

/// Failure kind for a rejected request, given the error's `code` if it had one.
fn error_kind(code: Option<f64>) -> LocationError {
    match code {
        Some(code) if code.fract() == 0.0 && (0.0..=u16::MAX as f64).contains(&code) => {
            LocationError::from_code(code as u16)
        }
        _ => LocationError::Unknown,
    }
}

/// Handle to the page's location state.
#[derive(Clone, Copy, PartialEq)]
pub struct Geolocator {
    pub state: Signal<LocationTracker>,
    options: GeolocationOptions,
}

impl Geolocator {
    /// Start a request; the outcome is written back into `state` when the
    /// browser answers. Repeated calls are not de-duplicated.
    pub fn locate(&self) {
        let mut state = self.state;
        let options = self.options;
        let id = state.write().begin();
        spawn(async move {
            let outcome = current_position(options).await;
            state.write().settle(id, outcome);
        });
    }
}

/// Create the location state and fire one automatic request on mount.
pub fn use_geolocation(options: GeolocationOptions) -> Geolocator {
    let state = use_signal(LocationTracker::new);
    let geolocator = Geolocator { state, options };
    use_effect(move || geolocator.locate());
    geolocator
}
