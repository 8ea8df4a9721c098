// Integration tests for value containers: typed access, move and copy
// semantics on insertion, and invalidation of embedded views.

mod common;

use cef::values::ValueContainer;
use cef::{BinaryValue, DictionaryValue, Error, ListValue, Value, ValueState, ValueType};
use common::{assert_clean, setup};

#[test]
fn test_dictionary_typed_entries() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).expect("create dictionary");
		assert_eq!(dict.state().unwrap(), ValueState::RootOwned);
		assert!(!dict.is_read_only().unwrap());
		assert!(dict.is_empty().unwrap());

		assert!(dict.set_bool("enabled", true).unwrap());
		assert!(dict.set_int("count", 42).unwrap());
		assert!(dict.set_double("ratio", 0.25).unwrap());
		assert!(dict.set_string("name", Some("cef")).unwrap());
		assert!(dict.set_null("nothing").unwrap());

		assert_eq!(dict.len().unwrap(), 5);
		assert!(dict.get_bool("enabled").unwrap());
		assert_eq!(dict.get_int("count").unwrap(), 42);
		assert_eq!(dict.get_double("ratio").unwrap(), 0.25);
		assert_eq!(dict.get_string("name").unwrap().as_deref(), Some("cef"));
		assert_eq!(dict.get_type("nothing").unwrap(), ValueType::Null);
		assert_eq!(dict.get_type("missing").unwrap(), ValueType::Invalid);

		// Keys come back sorted by the engine.
		assert_eq!(dict.keys().unwrap(), ["count", "enabled", "name", "nothing", "ratio"]);

		assert!(dict.remove("count").unwrap());
		assert!(!dict.remove("count").unwrap());
		assert!(!dict.has_key("count").unwrap());
		assert_eq!(dict.get_int("count").unwrap(), 0);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_null_string_reads_back_as_none() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		assert!(dict.set_string("empty", None).unwrap());
		assert_eq!(dict.get_type("empty").unwrap(), ValueType::String);
		assert_eq!(dict.get_string("empty").unwrap(), None);
		assert_eq!(dict.get_string("missing").unwrap(), None);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_inserting_root_container_moves_it() {
	let (engine, rt) = setup();
	{
		let parent = DictionaryValue::create(&rt).unwrap();
		let child = DictionaryValue::create(&rt).unwrap();
		child.set_int("depth", 1).unwrap();

		assert!(parent.set_dictionary("child", &child).unwrap());
		assert_eq!(child.state().unwrap(), ValueState::Invalid);
		assert!(matches!(child.ensure_valid(), Err(Error::InvalidValue { .. })));

		let view = parent.get_dictionary("child").unwrap().expect("child entry");
		assert_eq!(view.state().unwrap(), ValueState::Embedded);
		assert_eq!(view.get_int("depth").unwrap(), 1);

		// Writes through the view land in the parent.
		view.set_int("depth", 2).unwrap();
		let again = parent.get_dictionary("child").unwrap().unwrap();
		assert_eq!(again.get_int("depth").unwrap(), 2);
		assert!(again.is_same(&view).unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_inserting_root_binary_moves_it() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		let blob = BinaryValue::create(&rt, b"abc").unwrap();
		assert_eq!(blob.state().unwrap(), ValueState::RootOwned);

		assert!(dict.set_binary("k", &blob).unwrap());
		assert!(!blob.is_valid().unwrap());
		assert_eq!(blob.state().unwrap(), ValueState::Invalid);

		let view = dict.get_binary("k").unwrap().expect("binary entry");
		assert!(view.is_owned().unwrap());
		assert_eq!(view.to_vec().unwrap(), b"abc");
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_child_dictionary_is_owned_by_parent() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		assert!(dict.set_int("age", 42).unwrap());
		assert_eq!(dict.get_int("age").unwrap(), 42);

		assert!(dict.set_dictionary("child", &DictionaryValue::create(&rt).unwrap()).unwrap());
		let child = dict.get_dictionary("child").unwrap().expect("child entry");
		assert!(child.is_owned().unwrap());

		child.set_string("name", Some("kid")).unwrap();
		let nested = dict.get_dictionary("child").unwrap().unwrap();
		assert_eq!(nested.get_string("name").unwrap().as_deref(), Some("kid"));
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_inserting_embedded_view_copies_it() {
	let (engine, rt) = setup();
	{
		let source = DictionaryValue::create(&rt).unwrap();
		let list = ListValue::create(&rt).unwrap();
		list.set_string(0, Some("a")).unwrap();
		source.set_list("items", &list).unwrap();

		let view = source.get_list("items").unwrap().unwrap();
		let target = DictionaryValue::create(&rt).unwrap();
		assert!(target.set_list("items", &view).unwrap());
		assert!(view.is_valid().unwrap());

		let copy = target.get_list("items").unwrap().unwrap();
		assert!(!copy.is_same(&view).unwrap());
		assert!(copy.is_equal(&view).unwrap());

		copy.set_string(1, Some("b")).unwrap();
		assert_eq!(view.len().unwrap(), 1);
		assert_eq!(copy.len().unwrap(), 2);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_removing_entry_invalidates_views() {
	let (engine, rt) = setup();
	{
		let parent = DictionaryValue::create(&rt).unwrap();
		parent.set_list("items", &ListValue::create(&rt).unwrap()).unwrap();
		let view = parent.get_list("items").unwrap().unwrap();
		assert!(view.is_valid().unwrap());

		assert!(parent.remove("items").unwrap());
		assert_eq!(view.state().unwrap(), ValueState::Invalid);
		assert_eq!(view.len().unwrap(), 0);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_dropping_root_invalidates_nested_views() {
	let (engine, rt) = setup();
	{
		let root = DictionaryValue::create(&rt).unwrap();
		let inner = DictionaryValue::create(&rt).unwrap();
		inner.set_binary("blob", &BinaryValue::create(&rt, b"xyz").unwrap()).unwrap();
		root.set_dictionary("inner", &inner).unwrap();

		let inner_view = root.get_dictionary("inner").unwrap().unwrap();
		let blob_view = inner_view.get_binary("blob").unwrap().unwrap();
		assert!(blob_view.is_valid().unwrap());

		drop(root);
		assert!(!inner_view.is_valid().unwrap());
		assert!(!blob_view.is_valid().unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_clear_invalidates_children() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		dict.set_dictionary("a", &DictionaryValue::create(&rt).unwrap()).unwrap();
		let view = dict.get_dictionary("a").unwrap().unwrap();

		assert!(dict.clear().unwrap());
		assert!(dict.is_empty().unwrap());
		assert!(!view.is_valid().unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_container_cannot_contain_itself() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		assert!(!dict.set_dictionary("me", &dict).unwrap());
		assert!(dict.is_valid().unwrap());

		let list = ListValue::create(&rt).unwrap();
		list.set_list(0, &ListValue::create(&rt).unwrap()).unwrap();
		let inner = list.get_list(0).unwrap().unwrap();
		assert!(!inner.set_list(0, &list).unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_dictionary_copy_can_skip_empty_children() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		dict.set_int("n", 1).unwrap();
		dict.set_dictionary("empty", &DictionaryValue::create(&rt).unwrap()).unwrap();
		dict.set_list("none", &ListValue::create(&rt).unwrap()).unwrap();

		let full = dict.copy(false).unwrap();
		assert_eq!(full.state().unwrap(), ValueState::RootOwned);
		assert!(full.is_equal(&dict).unwrap());
		assert!(!full.is_same(&dict).unwrap());

		let pruned = dict.copy(true).unwrap();
		assert_eq!(pruned.keys().unwrap(), ["n"]);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_list_grows_and_truncates() {
	let (engine, rt) = setup();
	{
		let list = ListValue::create(&rt).unwrap();
		assert!(list.set_int(3, 7).unwrap());
		assert_eq!(list.len().unwrap(), 4);
		assert_eq!(list.get_type(0).unwrap(), ValueType::Null);
		assert_eq!(list.get_int(3).unwrap(), 7);
		assert_eq!(list.get_type(10).unwrap(), ValueType::Invalid);

		assert!(list.set_size(2).unwrap());
		assert_eq!(list.len().unwrap(), 2);

		list.set_bool(1, true).unwrap();
		assert!(list.remove(0).unwrap());
		assert!(list.get_bool(0).unwrap());
		assert!(!list.remove(5).unwrap());

		assert!(list.clear().unwrap());
		assert!(list.is_empty().unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_binary_data_access() {
	let (engine, rt) = setup();
	{
		let binary = BinaryValue::create(&rt, b"hello world").unwrap();
		assert_eq!(binary.len().unwrap(), 11);
		assert_eq!(binary.to_vec().unwrap(), b"hello world");

		let mut buf = [0u8; 5];
		assert_eq!(binary.get_data(&mut buf, 6).unwrap(), 5);
		assert_eq!(&buf, b"world");
		assert_eq!(binary.get_data(&mut [], 0).unwrap(), 0);
		assert_eq!(binary.get_data(&mut buf, 11).unwrap(), 0);

		let copy = binary.copy().unwrap();
		assert!(copy.is_equal(&binary).unwrap());
		assert!(!copy.is_same(&binary).unwrap());

		let empty = BinaryValue::create(&rt, &[]).unwrap();
		assert!(empty.is_empty().unwrap());
		assert!(empty.to_vec().unwrap().is_empty());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_variant_holds_each_type() {
	let (engine, rt) = setup();
	{
		let value = Value::create(&rt).unwrap();
		assert_eq!(value.value_type().unwrap(), ValueType::Null);

		value.set_int(5).unwrap();
		assert_eq!(value.value_type().unwrap(), ValueType::Int);
		assert_eq!(value.get_int().unwrap(), 5);

		value.set_string(Some("text")).unwrap();
		assert_eq!(value.get_string().unwrap().as_deref(), Some("text"));

		let dict = DictionaryValue::create(&rt).unwrap();
		dict.set_bool("flag", true).unwrap();
		assert!(value.set_dictionary(&dict).unwrap());
		assert!(!dict.is_valid().unwrap());
		let held = value.get_dictionary().unwrap().expect("dictionary");
		assert!(held.get_bool("flag").unwrap());
		assert!(value.get_list().unwrap().is_none());

		let copy = value.copy().unwrap();
		assert!(copy.is_equal(&value).unwrap());
		assert!(!copy.is_same(&value).unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_entry_variant_is_embedded() {
	let (engine, rt) = setup();
	{
		let dict = DictionaryValue::create(&rt).unwrap();
		dict.set_list("items", &ListValue::create(&rt).unwrap()).unwrap();
		let entry = dict.get_value("items").unwrap().expect("entry");
		assert!(entry.is_owned().unwrap());
		assert_eq!(entry.value_type().unwrap(), ValueType::List);

		let other = DictionaryValue::create(&rt).unwrap();
		assert!(other.set_value("items", &entry).unwrap());
		assert!(entry.is_valid().unwrap());
		assert!(dict.get_value("missing").unwrap().is_none());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_disposed_proxy_rejects_calls() {
	let (engine, rt) = setup();
	let dict = DictionaryValue::create(&rt).unwrap();
	let alias = dict.clone();
	dict.dispose();
	dict.dispose();

	assert!(alias.is_disposed());
	let err = alias.len().unwrap_err();
	assert!(matches!(err, Error::Disposed { .. }));
	assert!(err.is_precondition());
	assert_eq!(engine.stats().live_objects, 0);
	drop((dict, alias));
	assert_clean(&engine, 0);
}
