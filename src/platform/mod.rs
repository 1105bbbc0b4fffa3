//! Platform abstraction layer
//!
//! Periodic tick sources for the animation:
//! - `BrowserInterval`: `setInterval` on the page's single thread (wasm32)
//! - `ThreadInterval`: a timer thread ticking a shared, locked wheel (native)

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use native::ThreadInterval;
#[cfg(target_arch = "wasm32")]
pub use web::BrowserInterval;
