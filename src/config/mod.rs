//! Settings resolution for constellation.
//!
//! This module handles:
//! - Candidate file discovery and the fall-back cascade
//! - Config file parsing (custom hook, then by extension)
//! - Environment and dependency-directory collaborators

pub mod cascade;
pub mod parser;
pub mod sources;
pub mod types;

pub use cascade::Resolver;
pub use parser::{ConfigParser, DefaultParser, Format, load_config_file, parse_config_str};
pub use sources::{DependencyDirs, Environment, NoDependencies, ProcessEnv, SearchPath};
pub use types::{CandidateFile, Profile, SourceKind};
