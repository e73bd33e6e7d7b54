use crate::error::{ConstellationError, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Hook for bespoke file formats.
///
/// `parse_config_file` sees the raw contents of every candidate file before
/// the built-in formats do. Returning a non-null `Some` claims the file.
pub trait ConfigParser {
	fn parse_config_file(&self, _contents: &str) -> Option<Value> {
		None
	}
}

/// Parser with no custom format; every file goes to extension dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParser;

impl ConfigParser for DefaultParser {}

impl<F> ConfigParser for F
where
	F: Fn(&str) -> Option<Value>,
{
	fn parse_config_file(&self, contents: &str) -> Option<Value> {
		self(contents)
	}
}

/// Built-in formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
	#[cfg(feature = "yaml")]
	Yaml,
	Json,
	#[cfg(feature = "toml")]
	Toml,
}

impl Format {
	/// Format for `path`'s extension, if one is compiled in.
	pub fn from_path(path: &Path) -> Option<Format> {
		match path.extension()?.to_str()? {
			#[cfg(feature = "yaml")]
			"yml" | "yaml" => Some(Format::Yaml),
			"json" => Some(Format::Json),
			#[cfg(feature = "toml")]
			"toml" => Some(Format::Toml),
			_ => None,
		}
	}

	pub fn parse(self, content: &str) -> Result<Value> {
		let value: Value = match self {
			#[cfg(feature = "yaml")]
			Format::Yaml => serde_yaml::from_str(content)?,
			Format::Json => serde_json::from_str(content)?,
			#[cfg(feature = "toml")]
			Format::Toml => toml::from_str(content)?,
		};
		Ok(value)
	}
}

/// Load a candidate config file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_config_file(path: &Path, parser: &dyn ConfigParser) -> Result<Option<Value>> {
	if !path.exists() {
		debug!(path = %path.display(), "config file not found, skipping");
		return Ok(None);
	}

	let content =
		std::fs::read_to_string(path).map_err(|source| ConstellationError::ConfigRead {
			path: path.to_path_buf(),
			source,
		})?;

	parse_config_str(&content, path, parser).map(Some)
}

/// Parse config contents that were read from `path` (useful for testing).
pub fn parse_config_str(content: &str, path: &Path, parser: &dyn ConfigParser) -> Result<Value> {
	if let Some(value) = parser.parse_config_file(content)
		&& !value.is_null()
	{
		debug!(path = %path.display(), "parsed by custom parser");
		return Ok(value);
	}

	let format = Format::from_path(path).ok_or_else(|| ConstellationError::Parse {
		path: path.to_path_buf(),
	})?;
	debug!(path = %path.display(), ?format, "parsing by extension");
	format.parse(content)
}
