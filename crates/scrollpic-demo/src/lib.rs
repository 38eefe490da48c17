#![forbid(unsafe_code)]

//! Headless ScrollPic replay.
//!
//! Mounts a carousel on [`MemoryDom`](scrollpic_core::headless::MemoryDom),
//! plays a timed input script on a virtual clock and reports every mount,
//! input and settled transition as a [`replay::Frame`].

pub mod cli;
pub mod replay;
pub mod script;
