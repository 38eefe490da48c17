#![forbid(unsafe_code)]

//! `scrollpic-core` is the host-agnostic half of the ScrollPic carousel.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment owns the DOM and the timers;
//!   the controller talks to them only through the [`dom::Dom`] and
//!   [`scheduler::Scheduler`] traits.
//! - **Deterministic time**: [`scheduler::VirtualScheduler`] replaces wall
//!   clock timers so every transition can be replayed tick by tick.
//! - **No threads, no blocking**: suitable for `wasm32-unknown-unknown`.
//!
//! The browser binding lives in `scrollpic-web`.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use scrollpic_core::carousel::Carousel;
//! use scrollpic_core::config::CarouselConfig;
//! use scrollpic_core::headless::MemoryDom;
//! use scrollpic_core::scheduler::VirtualScheduler;
//!
//! let mut dom = MemoryDom::new();
//! let container = dom.element("div");
//! for _ in 0..3 {
//!     dom.append_element(container, "img");
//! }
//!
//! let config = CarouselConfig::new("hero", 600.0, 300.0);
//! let mut carousel = Carousel::new(config, dom, VirtualScheduler::new(), container).unwrap();
//! carousel.initialize().unwrap();
//! assert_eq!(carousel.strip().len(), 5);
//!
//! // One auto-advance period plus the animation.
//! carousel.advance_time(Duration::from_millis(3000));
//! carousel.run_until_idle();
//! assert_eq!(carousel.start(), Some(2));
//! assert_eq!(carousel.offset(), Some(-1200.0));
//! ```

pub mod carousel;
pub mod config;
pub mod dom;
pub mod error;
pub mod headless;
pub mod indicator;
pub mod scheduler;
pub mod stepper;
pub mod track;

pub use carousel::{Arrows, Carousel, Snapshot};
pub use config::CarouselConfig;
pub use error::{CarouselError, ConfigError, HostError};
pub use scheduler::{Scheduler, TimerHandle, TimerKind, VirtualScheduler};
pub use track::Direction;
