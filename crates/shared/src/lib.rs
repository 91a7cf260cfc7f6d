pub mod config;
pub mod error;
pub mod geo;
pub mod geolocation;
pub mod icons;
pub mod models;
pub mod samples;
pub mod scene;
pub mod styles;
