//! Skytab - current weather for your location or any city, in the terminal
//!
//! This library exposes the app's modules for the binary and tests.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod geolocation;
pub mod reducer;
pub mod session;
pub mod state;
pub mod thumbnail;
