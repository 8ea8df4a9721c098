// Shared setup for the proxy integration tests.

use cef::{Runtime, Settings};
use cefglue_testkit::FakeEngine;

/// A fresh fake engine, current on this thread, and a runtime bound to it.
pub fn setup() -> (FakeEngine, Runtime) {
	setup_with(FakeEngine::new(), Settings::default())
}

pub fn setup_with(engine: FakeEngine, settings: Settings) -> (FakeEngine, Runtime) {
	cefglue_testkit::init_tracing();
	let rt = Runtime::new(engine.api(), settings).expect("Failed to create runtime");
	(engine, rt)
}

/// Asserts every allocation was freed and no object is left alive beyond
/// `baseline`.
#[allow(dead_code)]
pub fn assert_clean(engine: &FakeEngine, baseline: i64) {
	let stats = engine.stats();
	assert!(stats.is_balanced(), "unbalanced engine stats: {stats:?}");
	assert_eq!(stats.live_objects, baseline, "leaked objects: {stats:?}");
}
