use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Counters one fake engine records.
#[derive(Debug, Default)]
pub struct Stats {
	live_objects: AtomicI64,
	created_objects: AtomicU64,
	userfree_allocs: AtomicU64,
	userfree_frees: AtomicU64,
	double_frees: AtomicU64,
	list_allocs: AtomicU64,
	list_frees: AtomicU64,
	map_allocs: AtomicU64,
	map_frees: AtomicU64,
	multimap_allocs: AtomicU64,
	multimap_frees: AtomicU64,
	over_releases: AtomicU64,
	use_after_release: AtomicU64,
	thread_violations: AtomicU64,
	plugin_cache_purges: AtomicU64,
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
	pub live_objects: i64,
	pub created_objects: u64,
	pub userfree_allocs: u64,
	pub userfree_frees: u64,
	pub double_frees: u64,
	pub list_allocs: u64,
	pub list_frees: u64,
	pub map_allocs: u64,
	pub map_frees: u64,
	pub multimap_allocs: u64,
	pub multimap_frees: u64,
	pub over_releases: u64,
	pub use_after_release: u64,
	pub thread_violations: u64,
	pub plugin_cache_purges: u64,
}

impl StatsSnapshot {
	/// True when every string and collection allocation was freed exactly
	/// once and no object was over-released or used after release.
	pub fn is_balanced(&self) -> bool {
		self.userfree_allocs == self.userfree_frees
			&& self.list_allocs == self.list_frees
			&& self.map_allocs == self.map_frees
			&& self.multimap_allocs == self.multimap_frees
			&& self.double_frees == 0
			&& self.over_releases == 0
			&& self.use_after_release == 0
	}
}

macro_rules! bump {
	($($name:ident => $field:ident;)*) => {
		$(
			pub(crate) fn $name(&self) {
				self.$field.fetch_add(1, Ordering::Relaxed);
			}
		)*
	};
}

impl Stats {
	bump! {
		userfree_alloc => userfree_allocs;
		userfree_free => userfree_frees;
		double_free => double_frees;
		list_alloc => list_allocs;
		list_free => list_frees;
		map_alloc => map_allocs;
		map_free => map_frees;
		multimap_alloc => multimap_allocs;
		multimap_free => multimap_frees;
		over_release => over_releases;
		use_after_release => use_after_release;
		thread_violation => thread_violations;
		plugin_cache_purge => plugin_cache_purges;
	}

	pub(crate) fn object_created(&self) {
		self.created_objects.fetch_add(1, Ordering::Relaxed);
		self.live_objects.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn object_destroyed(&self) {
		self.live_objects.fetch_sub(1, Ordering::Relaxed);
	}

	pub fn snapshot(&self) -> StatsSnapshot {
		let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
		StatsSnapshot {
			live_objects: self.live_objects.load(Ordering::Relaxed),
			created_objects: load(&self.created_objects),
			userfree_allocs: load(&self.userfree_allocs),
			userfree_frees: load(&self.userfree_frees),
			double_frees: load(&self.double_frees),
			list_allocs: load(&self.list_allocs),
			list_frees: load(&self.list_frees),
			map_allocs: load(&self.map_allocs),
			map_frees: load(&self.map_frees),
			multimap_allocs: load(&self.multimap_allocs),
			multimap_frees: load(&self.multimap_frees),
			over_releases: load(&self.over_releases),
			use_after_release: load(&self.use_after_release),
			thread_violations: load(&self.thread_violations),
			plugin_cache_purges: load(&self.plugin_cache_purges),
		}
	}
}
