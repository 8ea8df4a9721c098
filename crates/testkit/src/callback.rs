use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cefglue_sys::{cef_base_ref_counted_t, cef_callback_t};

use crate::object::{FakeState, new_object, state};
use crate::stats::Stats;

#[derive(Debug, Default)]
struct Counts {
	continued: AtomicUsize,
	cancelled: AtomicUsize,
}

/// Observes calls made on a callback from [`crate::FakeEngine::callback`].
#[derive(Debug, Clone)]
pub struct CallbackProbe {
	counts: Arc<Counts>,
}

impl CallbackProbe {
	pub fn continued(&self) -> usize {
		self.counts.continued.load(Ordering::Acquire)
	}

	pub fn cancelled(&self) -> usize {
		self.counts.cancelled.load(Ordering::Acquire)
	}
}

struct CallbackState {
	counts: Arc<Counts>,
}

impl FakeState for CallbackState {}

pub(crate) fn new_callback(stats: &Arc<Stats>) -> (*mut cef_callback_t, CallbackProbe) {
	let counts = Arc::new(Counts::default());
	let raw = cef_callback_t {
		base: cef_base_ref_counted_t::empty(0),
		cont: Some(cont),
		cancel: Some(cancel),
	};
	let ptr = new_object(
		stats,
		raw,
		CallbackState {
			counts: Arc::clone(&counts),
		},
	);
	(ptr, CallbackProbe { counts })
}

unsafe extern "C" fn cont(self_: *mut cef_callback_t) {
	if let Some(state) = unsafe { state::<_, CallbackState>(self_) } {
		state.counts.continued.fetch_add(1, Ordering::AcqRel);
	}
}

unsafe extern "C" fn cancel(self_: *mut cef_callback_t) {
	if let Some(state) = unsafe { state::<_, CallbackState>(self_) } {
		state.counts.cancelled.fetch_add(1, Ordering::AcqRel);
	}
}
