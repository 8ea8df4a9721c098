//! Conversion between value containers and [`serde_json::Value`].
//!
//! Integers that fit in `i32` become [`ValueType::Int`], other numbers
//! [`ValueType::Double`]. Binaries travel as standard base64 strings and do
//! not round-trip: they come back as strings.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cefglue_runtime::{Error, Result, Runtime};
use serde_json::{Map, Number, Value as Json};

use super::{BinaryValue, DictionaryValue, ListValue, Value, ValueContainer, ValueType};

/// Parses JSON text into a root-owned [`Value`].
pub fn parse_json(rt: &Runtime, text: &str) -> Result<Value> {
	let json: Json = serde_json::from_str(text)?;
	Value::from_json(rt, &json)
}

/// Serializes a value to compact JSON text.
pub fn write_json(value: &Value) -> Result<String> {
	Ok(serde_json::to_string(&value.to_json()?)?)
}

fn number(value: f64) -> Result<Json> {
	Number::from_f64(value)
		.map(Json::Number)
		.ok_or_else(|| Error::UnsupportedValue(format!("non-finite number {value}")))
}

fn string(value: Option<String>) -> Json {
	value.map_or(Json::Null, Json::String)
}

fn binary(value: Option<BinaryValue>) -> Result<Json> {
	match value {
		Some(value) => Ok(Json::String(STANDARD.encode(value.to_vec()?))),
		None => Ok(Json::Null),
	}
}

fn invalid(what: &str) -> Error {
	Error::UnsupportedValue(format!("{what} has no valid value"))
}

impl Value {
	/// Builds a root-owned value from JSON.
	pub fn from_json(rt: &Runtime, json: &Json) -> Result<Value> {
		let value = Value::create(rt)?;
		match json {
			Json::Null => value.set_null()?,
			Json::Bool(v) => value.set_bool(*v)?,
			Json::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
				Some(v) => value.set_int(v)?,
				None => value.set_double(n.as_f64().unwrap_or_default())?,
			},
			Json::String(v) => value.set_string(Some(v.as_str()))?,
			Json::Array(items) => value.set_list(&ListValue::from_json(rt, items)?)?,
			Json::Object(map) => value.set_dictionary(&DictionaryValue::from_json(rt, map)?)?,
		};
		Ok(value)
	}

	pub fn to_json(&self) -> Result<Json> {
		match self.value_type()? {
			ValueType::Null => Ok(Json::Null),
			ValueType::Bool => Ok(Json::Bool(self.get_bool()?)),
			ValueType::Int => Ok(Json::from(self.get_int()?)),
			ValueType::Double => number(self.get_double()?),
			ValueType::String => Ok(string(self.get_string()?)),
			ValueType::Binary => binary(self.get_binary()?),
			ValueType::Dictionary => match self.get_dictionary()? {
				Some(dict) => dict.to_json(),
				None => Ok(Json::Null),
			},
			ValueType::List => match self.get_list()? {
				Some(list) => list.to_json(),
				None => Ok(Json::Null),
			},
			ValueType::Invalid => Err(invalid(Self::TYPE_NAME)),
		}
	}
}

impl DictionaryValue {
	/// Builds a root-owned dictionary from a JSON object.
	pub fn from_json(rt: &Runtime, map: &Map<String, Json>) -> Result<DictionaryValue> {
		let dict = DictionaryValue::create(rt)?;
		for (key, json) in map {
			match json {
				Json::Null => dict.set_null(key)?,
				Json::Bool(v) => dict.set_bool(key, *v)?,
				Json::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
					Some(v) => dict.set_int(key, v)?,
					None => dict.set_double(key, n.as_f64().unwrap_or_default())?,
				},
				Json::String(v) => dict.set_string(key, Some(v.as_str()))?,
				Json::Array(items) => dict.set_list(key, &ListValue::from_json(rt, items)?)?,
				Json::Object(map) => dict.set_dictionary(key, &DictionaryValue::from_json(rt, map)?)?,
			};
		}
		Ok(dict)
	}

	/// Converts to a JSON object. Fails on an invalid dictionary.
	pub fn to_json(&self) -> Result<Json> {
		self.ensure_valid()?;
		let mut map = Map::new();
		for key in self.keys()? {
			let json = match self.get_type(&key)? {
				ValueType::Null => Json::Null,
				ValueType::Bool => Json::Bool(self.get_bool(&key)?),
				ValueType::Int => Json::from(self.get_int(&key)?),
				ValueType::Double => number(self.get_double(&key)?)?,
				ValueType::String => string(self.get_string(&key)?),
				ValueType::Binary => binary(self.get_binary(&key)?)?,
				ValueType::Dictionary => match self.get_dictionary(&key)? {
					Some(dict) => dict.to_json()?,
					None => Json::Null,
				},
				ValueType::List => match self.get_list(&key)? {
					Some(list) => list.to_json()?,
					None => Json::Null,
				},
				ValueType::Invalid => return Err(invalid(&format!("key '{key}'"))),
			};
			map.insert(key, json);
		}
		Ok(Json::Object(map))
	}
}

impl ListValue {
	/// Builds a root-owned list from a JSON array.
	pub fn from_json(rt: &Runtime, items: &[Json]) -> Result<ListValue> {
		let list = ListValue::create(rt)?;
		for (index, json) in items.iter().enumerate() {
			match json {
				Json::Null => list.set_null(index)?,
				Json::Bool(v) => list.set_bool(index, *v)?,
				Json::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
					Some(v) => list.set_int(index, v)?,
					None => list.set_double(index, n.as_f64().unwrap_or_default())?,
				},
				Json::String(v) => list.set_string(index, Some(v.as_str()))?,
				Json::Array(items) => list.set_list(index, &ListValue::from_json(rt, items)?)?,
				Json::Object(map) => list.set_dictionary(index, &DictionaryValue::from_json(rt, map)?)?,
			};
		}
		Ok(list)
	}

	/// Converts to a JSON array. Fails on an invalid list.
	pub fn to_json(&self) -> Result<Json> {
		self.ensure_valid()?;
		let len = self.len()?;
		let mut items = Vec::with_capacity(len);
		for index in 0..len {
			let json = match self.get_type(index)? {
				ValueType::Null => Json::Null,
				ValueType::Bool => Json::Bool(self.get_bool(index)?),
				ValueType::Int => Json::from(self.get_int(index)?),
				ValueType::Double => number(self.get_double(index)?)?,
				ValueType::String => string(self.get_string(index)?),
				ValueType::Binary => binary(self.get_binary(index)?)?,
				ValueType::Dictionary => match self.get_dictionary(index)? {
					Some(dict) => dict.to_json()?,
					None => Json::Null,
				},
				ValueType::List => match self.get_list(index)? {
					Some(list) => list.to_json()?,
					None => Json::Null,
				},
				ValueType::Invalid => return Err(invalid(&format!("index {index}"))),
			};
			items.push(json);
		}
		Ok(Json::Array(items))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_non_finite_numbers_are_rejected() {
		assert!(number(1.5).is_ok());
		let err = number(f64::NAN).unwrap_err();
		assert!(err.is_marshal());
		assert!(number(f64::INFINITY).is_err());
	}

	#[test]
	fn test_null_string_maps_to_json_null() {
		assert_eq!(string(None), Json::Null);
		assert_eq!(string(Some("x".into())), json!("x"));
	}
}
