//! Browser UI Web
//!
//! Dashboard of remote browser sessions plus a per-session VNC view,
//! built with Leptos on top of `browser-ui-core`.

pub mod api;
pub mod app;
pub mod clipboard;
pub mod components;
pub mod config;
pub mod pages;

pub use app::App;
