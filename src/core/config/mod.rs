pub mod data;
pub mod io;
pub mod resolve;

pub use data::{BackendConfig, Config};
pub use io::ConfigError;
pub use resolve::BackendOverrides;
