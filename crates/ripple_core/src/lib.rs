//! Ripple Core
//!
//! Host-facing primitives shared by the Ripple motion engine:
//!
//! - **Values**: structured numeric containers (vectors, colors, layout
//!   dimensions, 2D transforms)
//! - **Subscribers**: ordered callback registries that tolerate mutation
//!   during dispatch
//! - **Clocks**: the per-frame delta-time contract and a manually driven
//!   `Heartbeat` implementation
//!
//! # Example
//!
//! ```rust
//! use ripple_core::clock::{Clock, Heartbeat};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clock = Heartbeat::new();
//! let elapsed = Rc::new(Cell::new(0.0f32));
//!
//! let sink = elapsed.clone();
//! let subscription = clock.subscribe(Box::new(move |dt: f32| sink.set(sink.get() + dt)));
//!
//! clock.tick(0.25);
//! clock.tick(0.25);
//! subscription.unsubscribe();
//! clock.tick(0.25);
//!
//! assert_eq!(elapsed.get(), 0.5);
//! ```

pub mod clock;
pub mod subscribers;
pub mod values;

pub use clock::{Clock, ClockSubscription, Heartbeat, TickCallback};
pub use subscribers::{SubscriberId, Subscribers};
pub use values::{Color, Transform2D, UDim, UDim2, Vec2, Vec3};
