//! The merged key-value store behind every [`Constellation`](crate::Constellation).

use serde_json::{Map, Value};

/// Insertion-ordered settings keyed by their string form.
///
/// Every key type that implements `AsRef<str>` is normalized to its string
/// form, so `"foo"`, `String::from("foo")` and a symbol-like enum whose
/// `as_ref()` is `"foo"` all address the same entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
	data: Map<String, Value>,
}

impl Settings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Merge `candidate` without overwriting anything already present.
	///
	/// Only missing keys receive the candidate's value. Merging is shallow:
	/// an existing key blocks the whole candidate value, nested mappings
	/// included. Returns the number of keys inserted.
	pub fn reverse_merge<I, K>(&mut self, candidate: I) -> usize
	where
		I: IntoIterator<Item = (K, Value)>,
		K: AsRef<str>,
	{
		let mut inserted = 0;
		for (key, value) in candidate {
			let key = key.as_ref();
			if !self.data.contains_key(key) {
				self.data.insert(key.to_owned(), value);
				inserted += 1;
			}
		}
		inserted
	}

	/// Look up a setting. Unknown keys return `None`.
	pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
		self.data.get(key.as_ref())
	}

	pub fn has(&self, key: impl AsRef<str>) -> bool {
		self.data.contains_key(key.as_ref())
	}

	/// Copy of the full mapping. Changes to the copy never reach the store.
	pub fn snapshot(&self) -> Map<String, Value> {
		self.data.clone()
	}

	/// Key-value pairs in insertion order.
	pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.data.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.data.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

impl<'a> IntoIterator for &'a Settings {
	type Item = (&'a String, &'a Value);
	type IntoIter = serde_json::map::Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.data.iter()
	}
}
