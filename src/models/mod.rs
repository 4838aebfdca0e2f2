//! Data models

pub mod prediction;
pub mod views;

pub use prediction::*;
pub use views::*;
