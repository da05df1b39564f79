//! Plot engines

pub mod heatmap;
pub mod pie;
pub mod standard;
pub mod timeline;
pub mod utils;
pub mod word_cloud;
