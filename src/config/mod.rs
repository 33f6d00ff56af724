//! Configuration loading and validation
//!
//! Configuration comes from a TOML file split into `[scraper]`, `[throttle]`
//! and `[output]` sections. Everything except the engine and the keyword
//! list has a default. Validation runs at load time and treats violations as
//! hard errors.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, OutputConfig, ScraperConfig, ThrottleConfig};
pub use validation::validate;
