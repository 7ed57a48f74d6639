//! Platform abstraction layer
//!
//! Handles browser integration for:
//! - Reduced-motion preference
//! - Counter badge position (DOM)
//! - Award persistence over `fetch`
//! - JS-facing field handle

#[cfg(target_arch = "wasm32")]
pub mod web;
