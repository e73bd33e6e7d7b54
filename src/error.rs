use std::path::PathBuf;

/// Library-level structured errors for constellation.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConstellationError {
	/// An existing file that neither the custom parser nor any built-in format could handle.
	#[error(
		"Could not parse {path}. Implement ConfigParser or enable a format feature for this extension"
	)]
	Parse { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[cfg(feature = "yaml")]
	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[cfg(feature = "toml")]
	#[error(transparent)]
	Toml(#[from] toml::de::Error),
}

/// Result type alias using ConstellationError.
pub type Result<T> = std::result::Result<T, ConstellationError>;
