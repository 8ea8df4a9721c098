//! cef: typed Rust proxies over the CEF object model.
//!
//! Every proxy wraps one native reference through
//! [`cefglue_runtime::Handle`], so refcounting, identity caching and
//! disposal behave the same way for all of them. Proxies carry the
//! [`Runtime`] they were created with; build one per engine instance, or
//! install a process-wide one with [`initialize`].
//!
//! # Example
//!
//! ```ignore
//! use cef::{DictionaryValue, Runtime, Settings};
//!
//! let rt = Runtime::load("libcef.so", Settings::from_env())?;
//! let dict = DictionaryValue::create(&rt)?;
//! dict.set_int("age", 42)?;
//! assert_eq!(dict.get_int("age")?, 42);
//!
//! let child = DictionaryValue::create(&rt)?;
//! dict.set_dictionary("child", &child)?;
//! // The child was moved into `dict`.
//! assert!(!child.is_valid()?);
//! ```
//!
//! # Thread affinity
//!
//! Each proxy declares an `AFFINITY` constant that `to_native` checks before
//! every native call. Values, requests, streams and engine callbacks may be
//! used from any thread. Preference and extension methods of
//! [`RequestContext`] follow [`RequestContext::PREFERENCES_AFFINITY`] (UI
//! thread only). Violations fail with [`Error::WrongThread`] while
//! [`Settings::enforce_thread_affinity`] is on.

mod proxy;

mod callback;
mod handlers;
mod net_error;
mod request;
mod request_context;
mod stream;
pub mod values;

pub use callback::Callback;
pub use cefglue_runtime::{
	Affinity, CefLibrary, Error, Ownership, PanicPolicy, Result, Runtime, Settings, ThreadId, global,
	initialize, shutdown,
};
pub use handlers::{CompletionCallback, ReadHandler, ResolveCallback};
pub use net_error::NetError;
pub use request::Request;
pub use request_context::{PreferenceUpdate, RequestContext};
pub use stream::StreamReader;
pub use values::{BinaryValue, DictionaryValue, ListValue, Value, ValueContainer, ValueState, ValueType};
