use serde::Serialize;
use std::path::{Path, PathBuf};

/// Per-consumer resolution settings: which environment variables feed which
/// keys, which file to look for, and whether dependency roots are searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
	/// `(settings_key, env_var_name)` pairs, in declaration order.
	pub env_params: Vec<(String, String)>,

	/// File searched for in every candidate directory. `None` skips all file passes.
	pub config_file: Option<PathBuf>,

	/// Whether dependency root directories are searched after the home directory.
	pub load_from_dependency_dirs: bool,
}

impl Profile {
	pub fn new() -> Self {
		Self::default()
	}

	/// Map `key` to the environment variable `var`.
	pub fn env_param(mut self, key: impl Into<String>, var: impl Into<String>) -> Self {
		self.env_params.push((key.into(), var.into()));
		self
	}

	pub fn env_params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.env_params
			.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.config_file = Some(path.into());
		self
	}

	pub fn load_from_dependency_dirs(mut self, enabled: bool) -> Self {
		self.load_from_dependency_dirs = enabled;
		self
	}

	/// Resolve the configured file against `base_dir`.
	pub fn config_file_in(&self, base_dir: &Path) -> Option<PathBuf> {
		self.config_file.as_ref().map(|file| base_dir.join(file))
	}
}

/// Where a setting came from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
	Explicit,
	Environment,
	WorkingDir,
	HomeDir,
	DependencyDir,
}

impl std::fmt::Display for SourceKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SourceKind::Explicit => write!(f, "explicit"),
			SourceKind::Environment => write!(f, "environment"),
			SourceKind::WorkingDir => write!(f, "working-dir"),
			SourceKind::HomeDir => write!(f, "home-dir"),
			SourceKind::DependencyDir => write!(f, "dependency-dir"),
		}
	}
}

/// A config file path resolved against one base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
	pub kind: SourceKind,
	pub path: PathBuf,
}
