use crate::config::parser::{ConfigParser, DefaultParser, load_config_file};
use crate::config::sources::{DependencyDirs, Environment, NoDependencies, ProcessEnv};
use crate::config::types::{CandidateFile, Profile, SourceKind};
use crate::error::Result;
use crate::settings::Settings;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Runs the fall-back cascade for one [`Profile`].
///
/// The cascade order is:
/// 1. Explicit data passed to [`Resolver::resolve`]
/// 2. Environment variables named in `env_params`
/// 3. `config_file` relative to the working directory
/// 4. `config_file` relative to the home directory
/// 5. `config_file` relative to each dependency root (if enabled)
///
/// Every pass is a reverse merge, so values found earlier always win.
pub struct Resolver<'a> {
	profile: &'a Profile,
	parser: Box<dyn ConfigParser + 'a>,
	env: Box<dyn Environment + 'a>,
	dependencies: Box<dyn DependencyDirs + 'a>,
	working_dir: Option<PathBuf>,
	home_dir: Option<PathBuf>,
}

impl<'a> Resolver<'a> {
	/// Resolver backed by the process environment, current directory and home directory.
	pub fn new(profile: &'a Profile) -> Self {
		let working_dir = match std::env::current_dir() {
			Ok(dir) => Some(dir),
			Err(e) => {
				warn!("Failed to get current directory, skipping it: {e}");
				None
			}
		};

		Self {
			profile,
			parser: Box::new(DefaultParser),
			env: Box::new(ProcessEnv),
			dependencies: Box::new(NoDependencies),
			working_dir,
			home_dir: dirs::home_dir(),
		}
	}

	/// Install a custom format hook consulted before extension dispatch.
	pub fn with_parser(mut self, parser: impl ConfigParser + 'a) -> Self {
		self.parser = Box::new(parser);
		self
	}

	pub fn with_environment(mut self, env: impl Environment + 'a) -> Self {
		self.env = Box::new(env);
		self
	}

	/// Provider of dependency roots, used only when the profile enables them.
	pub fn with_dependency_dirs(mut self, dependencies: impl DependencyDirs + 'a) -> Self {
		self.dependencies = Box::new(dependencies);
		self
	}

	pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.working_dir = Some(dir.into());
		self
	}

	pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.home_dir = Some(dir.into());
		self
	}

	pub fn profile(&self) -> &Profile {
		self.profile
	}

	/// Resolve a fresh [`Settings`] store.
	pub fn resolve<I, K>(&self, explicit: I) -> Result<Settings>
	where
		I: IntoIterator<Item = (K, Value)>,
		K: AsRef<str>,
	{
		let mut settings = Settings::new();
		self.resolve_into(&mut settings, explicit)?;
		Ok(settings)
	}

	/// Run every pass against `settings`. Existing entries keep priority over all sources.
	pub fn resolve_into<I, K>(&self, settings: &mut Settings, explicit: I) -> Result<()>
	where
		I: IntoIterator<Item = (K, Value)>,
		K: AsRef<str>,
	{
		let inserted = settings.reverse_merge(explicit);
		trace!(source = %SourceKind::Explicit, inserted, "merged");

		let inserted = settings.reverse_merge(self.env_values());
		trace!(source = %SourceKind::Environment, inserted, "merged");

		for candidate in self.candidate_files() {
			self.fall_back_on_file(settings, &candidate)?;
		}

		Ok(())
	}

	/// Config file paths the file passes consult, in precedence order.
	pub fn candidate_files(&self) -> Vec<CandidateFile> {
		if self.profile.config_file.is_none() {
			return Vec::new();
		}

		let mut candidates = Vec::new();
		let mut push = |kind: SourceKind, dir: &Path| {
			if let Some(path) = self.profile.config_file_in(dir) {
				candidates.push(CandidateFile { kind, path });
			}
		};

		match self.working_dir {
			Some(ref dir) => push(SourceKind::WorkingDir, dir.as_path()),
			None => debug!("No working directory, skipping it"),
		}
		match self.home_dir {
			Some(ref dir) => push(SourceKind::HomeDir, dir.as_path()),
			None => debug!("No home directory, skipping it"),
		}
		if self.profile.load_from_dependency_dirs {
			for dir in self.dependencies.dependency_dirs() {
				push(SourceKind::DependencyDir, dir.as_path());
			}
		}

		candidates
	}

	/// Values of the profile's environment variables that are defined.
	fn env_values(&self) -> Vec<(&str, Value)> {
		self.profile
			.env_params
			.iter()
			.filter_map(|(key, var)| {
				self.env
					.var(var)
					.map(|value| (key.as_str(), Value::String(value)))
			})
			.collect()
	}

	fn fall_back_on_file(&self, settings: &mut Settings, candidate: &CandidateFile) -> Result<()> {
		let Some(value) = load_config_file(&candidate.path, self.parser.as_ref())? else {
			return Ok(());
		};

		match value {
			Value::Object(map) => {
				let inserted = settings.reverse_merge(map);
				debug!(
					source = %candidate.kind,
					path = %candidate.path.display(),
					inserted,
					"merged config file"
				);
			}
			other => debug!(
				path = %candidate.path.display(),
				"ignoring config file that is not a mapping: {}",
				type_name(&other)
			),
		}

		Ok(())
	}
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ConstellationError;
	use serde_json::json;
	use std::collections::HashMap;
	use std::fs;

	struct Dirs {
		_root: tempfile::TempDir,
		cwd: PathBuf,
		home: PathBuf,
	}

	fn temp_dirs() -> Dirs {
		let root = tempfile::tempdir().unwrap();
		let cwd = root.path().join("cwd");
		let home = root.path().join("home");
		fs::create_dir_all(&cwd).unwrap();
		fs::create_dir_all(&home).unwrap();
		Dirs {
			_root: root,
			cwd,
			home,
		}
	}

	fn write(base_dir: &Path, relative: &str, content: &str) {
		let path = base_dir.join(relative);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, content).unwrap();
	}

	fn no_explicit() -> Vec<(&'static str, Value)> {
		Vec::new()
	}

	#[test]
	fn test_env_values_skip_undefined_vars() {
		let profile = Profile::new()
			.env_param("foo", "MY_FOO")
			.env_param("bar", "MY_BAR");
		let env = HashMap::from([("MY_BAR".to_string(), String::new())]);
		let resolver = Resolver::new(&profile).with_environment(env);

		let settings = resolver.resolve(no_explicit()).unwrap();
		assert!(!settings.has("foo"));
		assert_eq!(settings.get("bar"), Some(&json!("")));
	}

	#[test]
	fn test_no_config_file_skips_file_passes() {
		let dirs = temp_dirs();
		write(&dirs.home, "config.xqx", "would fail to parse");
		let profile = Profile::new().load_from_dependency_dirs(true);
		let resolver = Resolver::new(&profile)
			.with_environment(HashMap::<String, String>::new())
			.with_working_dir(&dirs.cwd)
			.with_home_dir(&dirs.home)
			.with_dependency_dirs(vec![dirs.home.clone()]);

		assert!(resolver.candidate_files().is_empty());
		let settings = resolver.resolve([("foo", json!("FOO"))]).unwrap();
		assert_eq!(settings.len(), 1);
	}

	#[test]
	fn test_candidate_files_order() {
		let profile = Profile::new()
			.config_file("app.yml")
			.load_from_dependency_dirs(true);
		let resolver = Resolver::new(&profile)
			.with_working_dir("/work")
			.with_home_dir("/home/me")
			.with_dependency_dirs(vec![PathBuf::from("/deps/a"), PathBuf::from("/deps/b")]);

		let candidates = resolver.candidate_files();
		let kinds: Vec<_> = candidates.iter().map(|c| c.kind).collect();
		let paths: Vec<_> = candidates.iter().map(|c| c.path.clone()).collect();

		assert_eq!(
			kinds,
			[
				SourceKind::WorkingDir,
				SourceKind::HomeDir,
				SourceKind::DependencyDir,
				SourceKind::DependencyDir,
			]
		);
		assert_eq!(
			paths,
			[
				PathBuf::from("/work/app.yml"),
				PathBuf::from("/home/me/app.yml"),
				PathBuf::from("/deps/a/app.yml"),
				PathBuf::from("/deps/b/app.yml"),
			]
		);
	}

	#[test]
	fn test_dependency_dirs_ignored_when_disabled() {
		let profile = Profile::new().config_file("app.yml");
		let resolver = Resolver::new(&profile)
			.with_working_dir("/work")
			.with_home_dir("/home/me")
			.with_dependency_dirs(vec![PathBuf::from("/deps/a")]);

		assert!(
			resolver
				.candidate_files()
				.iter()
				.all(|c| c.kind != SourceKind::DependencyDir)
		);
	}

	#[test]
	fn test_first_dependency_dir_wins() {
		let dirs = temp_dirs();
		let first = dirs.home.join("gems/first");
		let second = dirs.home.join("gems/second");
		write(&first, "app.json", r#"{"foo": "first"}"#);
		write(&second, "app.json", r#"{"foo": "second", "bar": "second"}"#);

		let profile = Profile::new()
			.config_file("app.json")
			.load_from_dependency_dirs(true);
		let resolver = Resolver::new(&profile)
			.with_environment(HashMap::<String, String>::new())
			.with_working_dir(&dirs.cwd)
			.with_home_dir(&dirs.home)
			.with_dependency_dirs(vec![first, second]);

		let settings = resolver.resolve(no_explicit()).unwrap();
		assert_eq!(settings.get("foo"), Some(&json!("first")));
		assert_eq!(settings.get("bar"), Some(&json!("second")));
	}

	#[test]
	fn test_non_mapping_file_is_ignored() {
		let dirs = temp_dirs();
		write(&dirs.cwd, "app.json", "[1, 2, 3]");
		write(&dirs.home, "app.json", r#"{"foo": "home"}"#);

		let profile = Profile::new().config_file("app.json");
		let resolver = Resolver::new(&profile)
			.with_environment(HashMap::<String, String>::new())
			.with_working_dir(&dirs.cwd)
			.with_home_dir(&dirs.home);

		let settings = resolver.resolve(no_explicit()).unwrap();
		assert_eq!(settings.snapshot(), json!({"foo": "home"}).as_object().unwrap().clone());
	}

	#[test]
	fn test_resolve_into_keeps_existing_entries() {
		let profile = Profile::new().env_param("foo", "MY_FOO");
		let env = HashMap::from([("MY_FOO".to_string(), "envfoo".to_string())]);
		let resolver = Resolver::new(&profile).with_environment(env);

		let mut settings = Settings::new();
		settings.reverse_merge([("foo", json!("preset"))]);
		resolver.resolve_into(&mut settings, no_explicit()).unwrap();

		assert_eq!(settings.get("foo"), Some(&json!("preset")));
	}

	#[test]
	fn test_parse_error_names_failing_path() {
		let dirs = temp_dirs();
		write(&dirs.cwd, "app.xqx", "foo: xqxfoo");

		let profile = Profile::new().config_file("app.xqx");
		let resolver = Resolver::new(&profile)
			.with_environment(HashMap::<String, String>::new())
			.with_working_dir(&dirs.cwd)
			.with_home_dir(&dirs.home);

		match resolver.resolve(no_explicit()).unwrap_err() {
			ConstellationError::Parse { path } => assert_eq!(path, dirs.cwd.join("app.xqx")),
			other => panic!("Expected Parse error, got {other:?}"),
		}
	}

	#[test]
	fn test_type_name() {
		assert_eq!(type_name(&json!([1])), "array");
		assert_eq!(type_name(&json!("x")), "string");
		assert_eq!(type_name(&Value::Null), "null");
	}
}
