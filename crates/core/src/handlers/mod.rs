//! Rust handlers the engine calls back into.
//!
//! Each trait has a monomorphized set of `extern "C"` trampolines. Exporting
//! a handler registers it in the runtime's callback table; the engine's last
//! release of the native object drops it. Panics inside a handler never
//! reach the engine: they are caught and handled per
//! [`PanicPolicy`](cefglue_runtime::PanicPolicy).

mod completion;
mod read;
mod resolve;

pub use completion::CompletionCallback;
pub use read::ReadHandler;
pub use resolve::ResolveCallback;

pub(crate) use completion::export_completion;
pub(crate) use read::export_read_handler;
pub(crate) use resolve::export_resolve;
