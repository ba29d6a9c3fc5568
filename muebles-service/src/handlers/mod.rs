//! HTTP handlers

pub mod fallback;
pub mod muebles;

pub use fallback::{not_found, NOT_FOUND_HTML};
