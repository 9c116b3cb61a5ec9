//! Presentation layer for the catalog view.
//!
//! - [`driver`] runs a [`crate::core::view::ViewController`] and feeds
//!   background fetch results back into it.
//! - [`executors`] spawns those fetches.
//! - [`render`] turns controller state into terminal text.
//!
//! Ownership boundary: this layer presents state and runs I/O, while
//! [`crate::core`] owns the state transitions.

pub mod driver;
pub mod executors;
pub mod render;
