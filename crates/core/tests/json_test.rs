// Integration tests for JSON conversion of value containers.

mod common;

use cef::values::{parse_json, write_json};
use cef::{BinaryValue, DictionaryValue, Error, ListValue, Value, ValueType};
use common::{assert_clean, setup};
use serde_json::json;

#[test]
fn test_parse_and_write_nested_document() {
	let (engine, rt) = setup();
	{
		let text = r#"{"name":"cef","version":116,"ratio":1.5,"tags":["a","b"],"nested":{"ok":true},"none":null}"#;
		let value = parse_json(&rt, text).expect("parse document");
		assert_eq!(value.value_type().unwrap(), ValueType::Dictionary);

		let dict = value.get_dictionary().unwrap().unwrap();
		assert_eq!(dict.get_int("version").unwrap(), 116);
		assert_eq!(dict.get_double("ratio").unwrap(), 1.5);
		let tags = dict.get_list("tags").unwrap().unwrap();
		assert_eq!(tags.get_string(1).unwrap().as_deref(), Some("b"));

		let written: serde_json::Value = serde_json::from_str(&write_json(&value).unwrap()).unwrap();
		let expected: serde_json::Value = serde_json::from_str(text).unwrap();
		assert_eq!(written, expected);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_integers_outside_i32_become_doubles() {
	let (engine, rt) = setup();
	{
		let value = Value::from_json(&rt, &json!(1_099_511_627_776_i64)).unwrap();
		assert_eq!(value.value_type().unwrap(), ValueType::Double);
		assert_eq!(value.get_double().unwrap(), 1_099_511_627_776.0);

		let small = Value::from_json(&rt, &json!(-7)).unwrap();
		assert_eq!(small.value_type().unwrap(), ValueType::Int);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_binary_is_written_as_base64() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		dict.set_binary("blob", &BinaryValue::create(&rt, b"hi").unwrap()).unwrap();
		dict.set_string("missing", None).unwrap();
		assert_eq!(dict.to_json().unwrap(), json!({"blob": "aGk=", "missing": null}));
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_list_round_trip_keeps_order() {
	let (engine, rt) = setup();
	{
		let json = json!([3, "x", [true, null], {"k": 2.5}]);
		let list = ListValue::from_json(&rt, json.as_array().unwrap()).unwrap();
		assert_eq!(list.len().unwrap(), 4);
		assert_eq!(list.get_type(2).unwrap(), ValueType::List);
		assert_eq!(list.to_json().unwrap(), json);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_moved_container_cannot_be_written() {
	let (engine, rt) = setup();
	{
		let parent = DictionaryValue::create(&rt).unwrap();
		let child = DictionaryValue::create(&rt).unwrap();
		parent.set_dictionary("child", &child).unwrap();

		let err = child.to_json().unwrap_err();
		assert!(matches!(err, Error::InvalidValue { .. }), "unexpected error: {err}");
		assert_eq!(parent.to_json().unwrap(), json!({"child": {}}));
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_malformed_json_is_rejected() {
	let (engine, rt) = setup();
	let err = parse_json(&rt, "{not json").unwrap_err();
	assert!(matches!(err, Error::Json(_)));
	assert_clean(&engine, 0);
}
