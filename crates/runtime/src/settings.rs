//! Runtime configuration.
//!
//! Settings come from [`Settings::default`], a JSON document
//! ([`Settings::from_json`]), or environment overrides ([`Settings::from_env`]).

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the callback bridge does when a Rust handler panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicPolicy {
	/// Log the panic, count it, and return the callback's default value.
	#[default]
	LogAndSwallow,
	/// Log the panic and abort the process.
	Abort,
}

/// Behavior switches for a [`crate::Runtime`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
	/// Deduplicate owned wrappers of identity-cached proxy types.
	pub identity_cache: bool,
	/// Reject UI-only calls made off the UI thread before they reach the engine.
	pub enforce_thread_affinity: bool,
	/// Failure policy for panics inside exported callbacks.
	pub callback_panic: PanicPolicy,
	/// Compare the library's API hash with the one these bindings expect.
	pub check_api_hash: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			identity_cache: true,
			enforce_thread_affinity: true,
			callback_panic: PanicPolicy::LogAndSwallow,
			check_api_hash: true,
		}
	}
}

const ENV_IDENTITY_CACHE: &str = "CEFGLUE_IDENTITY_CACHE";
const ENV_ENFORCE_THREAD_AFFINITY: &str = "CEFGLUE_ENFORCE_THREAD_AFFINITY";
const ENV_CALLBACK_PANIC: &str = "CEFGLUE_CALLBACK_PANIC";
const ENV_CHECK_API_HASH: &str = "CEFGLUE_CHECK_API_HASH";

impl Settings {
	/// Parses settings from JSON. Missing fields keep their defaults.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Defaults overlaid with `CEFGLUE_*` environment variables.
	pub fn from_env() -> Self {
		Self::default().with_overrides(|key| std::env::var(key).ok())
	}

	/// Applies overrides from `lookup`, ignoring unrecognized values.
	pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(v) = lookup(ENV_IDENTITY_CACHE).and_then(|v| parse_flag(ENV_IDENTITY_CACHE, &v)) {
			self.identity_cache = v;
		}
		if let Some(v) = lookup(ENV_ENFORCE_THREAD_AFFINITY)
			.and_then(|v| parse_flag(ENV_ENFORCE_THREAD_AFFINITY, &v))
		{
			self.enforce_thread_affinity = v;
		}
		if let Some(v) = lookup(ENV_CALLBACK_PANIC).and_then(|v| parse_panic_policy(&v)) {
			self.callback_panic = v;
		}
		if let Some(v) = lookup(ENV_CHECK_API_HASH).and_then(|v| parse_flag(ENV_CHECK_API_HASH, &v)) {
			self.check_api_hash = v;
		}
		self
	}
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		other => {
			tracing::warn!(key, value = other, "ignoring unrecognized boolean setting");
			None
		}
	}
}

fn parse_panic_policy(value: &str) -> Option<PanicPolicy> {
	match value.trim().to_ascii_lowercase().as_str() {
		"log" | "log_and_swallow" | "swallow" => Some(PanicPolicy::LogAndSwallow),
		"abort" => Some(PanicPolicy::Abort),
		other => {
			tracing::warn!(key = ENV_CALLBACK_PANIC, value = other, "ignoring unrecognized panic policy");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[test]
	fn test_defaults_enable_every_check() {
		let settings = Settings::default();
		assert!(settings.identity_cache);
		assert!(settings.enforce_thread_affinity);
		assert!(settings.check_api_hash);
		assert_eq!(settings.callback_panic, PanicPolicy::LogAndSwallow);
	}

	#[test]
	fn test_from_json_keeps_defaults_for_missing_fields() {
		let settings = Settings::from_json(r#"{"identity_cache": false, "callback_panic": "abort"}"#)
			.unwrap();
		assert!(!settings.identity_cache);
		assert_eq!(settings.callback_panic, PanicPolicy::Abort);
		assert!(settings.enforce_thread_affinity);
	}

	#[test]
	fn test_from_json_rejects_unknown_policy() {
		let err = Settings::from_json(r#"{"callback_panic": "ignore"}"#).unwrap_err();
		assert!(matches!(err, crate::Error::Json(_)));
	}

	#[test]
	fn test_overrides_apply_recognized_values() {
		let settings = Settings::default().with_overrides(lookup(&[
			("CEFGLUE_IDENTITY_CACHE", "off"),
			("CEFGLUE_ENFORCE_THREAD_AFFINITY", "0"),
			("CEFGLUE_CALLBACK_PANIC", "ABORT"),
			("CEFGLUE_CHECK_API_HASH", "no"),
		]));
		assert!(!settings.identity_cache);
		assert!(!settings.enforce_thread_affinity);
		assert!(!settings.check_api_hash);
		assert_eq!(settings.callback_panic, PanicPolicy::Abort);
	}

	#[test]
	fn test_overrides_ignore_garbage() {
		let settings = Settings::default().with_overrides(lookup(&[
			("CEFGLUE_IDENTITY_CACHE", "maybe"),
			("CEFGLUE_CALLBACK_PANIC", "explode"),
		]));
		assert_eq!(settings, Settings::default());
	}
}
