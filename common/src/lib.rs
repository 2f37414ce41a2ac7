// Re-export models
pub use crate::models::*;

pub mod models;
pub mod reader;
pub mod utils;
pub mod validation;
