//! mcpdeck is a client for MCP-enabled backends: it discovers the prompts,
//! tools, and prompt files a backend exposes and lets you browse them.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the backend payloads and the HTTP client that fetches them.
//! - [`core`] owns configuration, catalog aggregation, and the list/detail
//!   view controller.
//! - [`ui`] runs the controller against live fetches and renders its state.
//! - [`utils`] holds URL helpers and logging setup.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
