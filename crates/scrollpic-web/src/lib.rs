#![forbid(unsafe_code)]

//! Browser binding for the ScrollPic carousel.
//!
//! The exported `ScrollPic` class wires `scrollpic-core` to a real page:
//! - [`Dom`](scrollpic_core::dom::Dom) over `web-sys` elements,
//! - a `setInterval`/`setTimeout` scheduler whose callbacks route back into
//!   the controller,
//! - click, hover and wheel listeners.
//!
//! Event decoding that does not need a browser lives in [`events`] so it can be
//! tested natively.

pub mod events;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod scheduler;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{ScrollPic, enable_logging};

/// Placeholder for the browser class on native targets, where only
/// [`events`] is usable. Lets the workspace build and test without wasm.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPic;
