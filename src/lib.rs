//! Constellation - layered settings resolved from explicit data, environment
//! variables and configuration files.
//!
//! This library provides:
//! - An insertion-ordered settings store with string-indifferent keys
//! - A fixed-precedence resolution cascade (explicit, environment, working
//!   directory, home directory, dependency directories)
//! - YAML and JSON config files out of the box, TOML behind the `toml`
//!   feature, and a hook for custom formats
//!
//! # Example
//!
//! ```no_run
//! use constellation::config::Profile;
//! use constellation::Constellation;
//! use serde_json::json;
//!
//! let profile = Profile::new()
//!     .env_param("token", "MY_APP_TOKEN")
//!     .config_file(".my_app.yml");
//!
//! let settings = Constellation::new(&profile, [("verbose", json!(true))]).unwrap();
//!
//! if let Some(token) = settings.get("token") {
//!     println!("token: {token}");
//! }
//! ```

pub mod config;
pub mod constellation;
pub mod error;
pub mod settings;

pub use constellation::Constellation;
pub use error::{ConstellationError, Result};
pub use settings::Settings;
