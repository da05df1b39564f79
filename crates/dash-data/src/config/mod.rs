//! Renderer configuration

pub mod settings;

pub use settings::*;
