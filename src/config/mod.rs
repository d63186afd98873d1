//! Configuration module for Job-Harvest
//!
//! This module handles loading, validating and persisting the TOML
//! configuration file, and the `section.key` settings surface used by
//! `job-harvest config set`.
//!
//! # Example
//!
//! ```no_run
//! use job_harvest::config::load_or_init;
//! use std::path::Path;
//!
//! let config = load_or_init(Path::new("job-harvest.toml")).unwrap();
//! println!("Exporting as {}", config.output.format);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AuthConfig, BrowserConfig, Config, CrawlerConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_init, save_config, set_setting};
pub use validation::validate;
