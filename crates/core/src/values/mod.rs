//! Binary, dictionary, list and variant values.
//!
//! Containers follow the engine's ownership rules:
//!
//! - A container from `create` or `copy` is [`ValueState::RootOwned`]: it
//!   owns its data.
//! - A container returned by a getter on another container is
//!   [`ValueState::Embedded`]: it is a view into the parent's data, and
//!   changes made through it show up in the parent.
//! - Setting a root-owned container into another moves its data, leaving the
//!   source [`ValueState::Invalid`]. Setting an embedded one copies it.
//! - Removing, replacing or clearing an entry invalidates embedded views of
//!   it, as does dropping a root's last reference.
//!
//! Calls on an invalid container are not rejected: the engine answers them
//! with defaults (`false`, `0`, `None`). Use [`ValueContainer::state`] or
//! [`ValueContainer::ensure_valid`] where that matters.

mod binary;
mod dictionary;
mod json;
mod list;
mod value;

use cefglue_runtime::{Error, Result};
use cefglue_sys as sys;

pub use binary::BinaryValue;
pub use dictionary::DictionaryValue;
pub use json::{parse_json, write_json};
pub use list::ListValue;
pub use value::Value;

/// Type tag of a value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
	/// The slot does not exist or the container is invalid.
	Invalid,
	Null,
	Bool,
	Int,
	Double,
	String,
	Binary,
	Dictionary,
	List,
}

impl ValueType {
	/// Unknown tags map to [`ValueType::Invalid`].
	pub fn from_raw(raw: sys::cef_value_type_t) -> Self {
		match raw {
			sys::VTYPE_NULL => ValueType::Null,
			sys::VTYPE_BOOL => ValueType::Bool,
			sys::VTYPE_INT => ValueType::Int,
			sys::VTYPE_DOUBLE => ValueType::Double,
			sys::VTYPE_STRING => ValueType::String,
			sys::VTYPE_BINARY => ValueType::Binary,
			sys::VTYPE_DICTIONARY => ValueType::Dictionary,
			sys::VTYPE_LIST => ValueType::List,
			_ => ValueType::Invalid,
		}
	}

	pub fn as_raw(self) -> sys::cef_value_type_t {
		match self {
			ValueType::Invalid => sys::VTYPE_INVALID,
			ValueType::Null => sys::VTYPE_NULL,
			ValueType::Bool => sys::VTYPE_BOOL,
			ValueType::Int => sys::VTYPE_INT,
			ValueType::Double => sys::VTYPE_DOUBLE,
			ValueType::String => sys::VTYPE_STRING,
			ValueType::Binary => sys::VTYPE_BINARY,
			ValueType::Dictionary => sys::VTYPE_DICTIONARY,
			ValueType::List => sys::VTYPE_LIST,
		}
	}
}

/// Ownership state of a value container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueState {
	/// Owns its data.
	RootOwned,
	/// A view into a parent container's data.
	Embedded,
	/// Moved into another container, or its parent is gone.
	Invalid,
}

/// Ownership queries shared by every value proxy.
pub trait ValueContainer {
	const TYPE_NAME: &'static str;

	/// True while the underlying data is reachable.
	fn is_valid(&self) -> Result<bool>;

	/// True when the data is owned by a parent container.
	fn is_owned(&self) -> Result<bool>;

	fn state(&self) -> Result<ValueState> {
		Ok(if !self.is_valid()? {
			ValueState::Invalid
		} else if self.is_owned()? {
			ValueState::Embedded
		} else {
			ValueState::RootOwned
		})
	}

	/// Fails with [`Error::InvalidValue`] unless the container is valid.
	fn ensure_valid(&self) -> Result<()> {
		if self.is_valid()? {
			Ok(())
		} else {
			Err(Error::InvalidValue {
				type_name: Self::TYPE_NAME,
			})
		}
	}
}

/// Implements [`ValueContainer`] over the proxy's inherent `is_valid` and
/// `is_owned`.
macro_rules! value_container {
	($($name:ident => $type_name:literal;)*) => {
		$(
			impl ValueContainer for $name {
				const TYPE_NAME: &'static str = $type_name;

				fn is_valid(&self) -> Result<bool> {
					$name::is_valid(self)
				}

				fn is_owned(&self) -> Result<bool> {
					$name::is_owned(self)
				}
			}
		)*
	};
}

value_container! {
	BinaryValue => "BinaryValue";
	DictionaryValue => "DictionaryValue";
	ListValue => "ListValue";
	Value => "Value";
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_value_type_raw_round_trip() {
		for ty in [
			ValueType::Invalid,
			ValueType::Null,
			ValueType::Bool,
			ValueType::Int,
			ValueType::Double,
			ValueType::String,
			ValueType::Binary,
			ValueType::Dictionary,
			ValueType::List,
		] {
			assert_eq!(ValueType::from_raw(ty.as_raw()), ty);
		}
		assert_eq!(ValueType::from_raw(99), ValueType::Invalid);
	}
}
