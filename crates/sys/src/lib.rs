//! Raw C ABI of the CEF object model.
//!
//! Every struct here mirrors the layout the engine library exposes. Objects
//! are reference counted: their first field is [`cef_base_ref_counted_t`] and
//! every method is an `Option<unsafe extern "C" fn>` taking the object itself
//! as the first argument.
//!
//! # Calling convention
//!
//! - Struct pointers *returned* from a function or method carry one reference
//!   owned by the caller.
//! - Struct pointers *passed* as arguments are borrowed for the duration of
//!   the call. A callee that keeps one must `add_ref` it.
//! - Strings returned as [`cef_string_userfree_t`] must be freed exactly once
//!   with [`CefApi::string_userfree_utf16_free`].
//! - Strings written into caller-provided `cef_string_t` out-parameters must be
//!   cleared with [`CefApi::string_utf16_clear`].
//!
//! Global entry points are collected in [`CefApi`] so a loader (or a test
//! double) can provide them as a table of function pointers.

#![allow(non_camel_case_types)]

mod api;
mod base;
mod callbacks;
mod request;
mod request_context;
mod stream;
mod string;
mod types;
mod values;

pub use api::{CEF_API_HASH_UNIVERSAL, CefApi};
pub use base::cef_base_ref_counted_t;
pub use callbacks::{cef_callback_t, cef_completion_callback_t, cef_resolve_callback_t};
pub use request::cef_request_t;
pub use request_context::cef_request_context_t;
pub use stream::{cef_read_handler_t, cef_stream_reader_t};
pub use string::{
	_cef_string_list_t, _cef_string_map_t, _cef_string_multimap_t, char16_t, cef_string_list_t,
	cef_string_map_t, cef_string_multimap_t, cef_string_t, cef_string_userfree_t,
	cef_string_userfree_utf16_t, cef_string_utf16_t,
};
pub use types::*;
pub use values::{cef_binary_value_t, cef_dictionary_value_t, cef_list_value_t, cef_value_t};
