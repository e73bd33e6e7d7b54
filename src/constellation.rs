use crate::config::{Profile, Resolver};
use crate::error::Result;
use crate::settings::Settings;
use serde_json::{Map, Value};

/// A settings object resolved once at construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Constellation {
	settings: Settings,
}

impl Constellation {
	/// Resolve `profile` against the process environment, current directory and home directory.
	pub fn new<I, K>(profile: &Profile, explicit: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, Value)>,
		K: AsRef<str>,
	{
		Self::resolve_with(&Resolver::new(profile), explicit)
	}

	/// Resolve with a customised [`Resolver`] (custom parser, dependency dirs, ...).
	pub fn resolve_with<I, K>(resolver: &Resolver<'_>, explicit: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, Value)>,
		K: AsRef<str>,
	{
		let settings = resolver.resolve(explicit)?;
		Ok(Self { settings })
	}

	pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
		self.settings.get(key)
	}

	pub fn has(&self, key: impl AsRef<str>) -> bool {
		self.settings.has(key)
	}

	/// Independent copy of every setting.
	pub fn snapshot(&self) -> Map<String, Value> {
		self.settings.snapshot()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.settings.entries()
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}
}

impl<'a> IntoIterator for &'a Constellation {
	type Item = (&'a String, &'a Value);
	type IntoIter = serde_json::map::Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		(&self.settings).into_iter()
	}
}
