pub mod app;
#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod detection;
pub mod fields;
pub mod hud;
pub mod idle;
pub mod logging;
pub mod pose;
pub mod presence;
pub mod render;
