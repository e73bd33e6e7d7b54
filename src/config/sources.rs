//! External collaborators consulted during resolution.
//!
//! The environment table and the list of dependency roots are read through
//! traits so callers (and tests) can supply their own.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Read-only view of environment variables.
pub trait Environment {
	/// Value of `name`, or `None` when it is not defined. An empty value is defined.
	fn var(&self, name: &str) -> Option<String>;
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
	fn var(&self, name: &str) -> Option<String> {
		std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
	}
}

impl Environment for HashMap<String, String> {
	fn var(&self, name: &str) -> Option<String> {
		self.get(name).cloned()
	}
}

/// Ordered root directories of installed dependencies.
///
/// The first directory has the highest priority among dependency sources.
pub trait DependencyDirs {
	fn dependency_dirs(&self) -> Vec<PathBuf>;
}

/// Provider that reports no dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDependencies;

impl DependencyDirs for NoDependencies {
	fn dependency_dirs(&self) -> Vec<PathBuf> {
		Vec::new()
	}
}

impl DependencyDirs for Vec<PathBuf> {
	fn dependency_dirs(&self) -> Vec<PathBuf> {
		self.clone()
	}
}

impl<F> DependencyDirs for F
where
	F: Fn() -> Vec<PathBuf>,
{
	fn dependency_dirs(&self) -> Vec<PathBuf> {
		self()
	}
}

/// Dependency roots taken from a platform path list (`:`-separated on Unix,
/// `;`-separated on Windows).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
	dirs: Vec<PathBuf>,
}

impl SearchPath {
	pub fn parse(list: impl Into<OsString>) -> Self {
		let list = list.into();
		let dirs = std::env::split_paths(&list)
			.filter(|dir| !dir.as_os_str().is_empty())
			.collect();
		Self { dirs }
	}

	/// Read the path list from environment variable `var`. Unset means no directories.
	pub fn from_env(env: &dyn Environment, var: &str) -> Self {
		env.var(var).map(Self::parse).unwrap_or_default()
	}
}

impl DependencyDirs for SearchPath {
	fn dependency_dirs(&self) -> Vec<PathBuf> {
		self.dirs.clone()
	}
}
