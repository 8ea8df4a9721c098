//! Native string list, map, and multimap handles.
//!
//! Each type allocates its handle on construction and frees it in `Drop`, so
//! the handle is released whether the native call succeeds, fails, or panics,
//! and also for empty inputs. Use them within one call scope: build (or
//! allocate empty), pass [`StringList::as_raw`] to the engine, read back.

mod list;
mod map;
mod multimap;

pub use list::{StringList, read_string_list};
pub use map::StringMap;
pub use multimap::StringMultimap;

#[cfg(test)]
mod tests;
