//! Ownership and marshalling layer between safe Rust and the CEF C ABI.
//!
//! This crate owns the parts of the bindings that every typed proxy shares:
//!
//! - [`Handle`]: a wrapper around one native reference, tagged
//!   [`Ownership::Owned`] or [`Ownership::Borrowed`].
//! - [`HandleRegistry`]: the identity cache mapping a native address to its
//!   live wrapper.
//! - [`string`] and [`collections`]: UTF-16 strings and string
//!   list/map/multimap handles, always released in `Drop`.
//! - [`callback`]: exports Rust handlers as native vtables whose lifetime is
//!   governed by the native refcount.
//! - [`Runtime`]: the injectable bundle of API table, settings, registry, and
//!   callback table every proxy carries.
//!
//! Typed proxies live in the `cefglue` crate.

pub mod callback;
pub mod collections;
mod error;
mod handle;
mod library;
mod proxy;
mod registry;
mod runtime;
mod settings;
pub mod string;
mod thread;

pub use callback::{CallbackTable, CallbackToken};
pub use error::{Error, Result};
pub use handle::{NativeRef, Ownership, RefCounted};
#[doc(hidden)]
pub use handle::type_name_of;
pub use library::CefLibrary;
pub use proxy::Handle;
pub use registry::{HandleRegistry, RegistryKey};
pub use runtime::{Runtime, global, initialize, shutdown};
pub use settings::{PanicPolicy, Settings};
pub use string::{CefStringArg, NativeStr, OutString, UserFreeString};
pub use thread::{Affinity, ThreadId};

/// Re-exported for use by [`native_call!`] in downstream crates.
#[doc(hidden)]
pub use cefglue_sys as sys;
