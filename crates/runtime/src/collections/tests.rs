use cefglue_testkit::FakeEngine;
use indexmap::IndexMap;

use super::*;
use crate::Error;

#[test]
fn test_list_round_trip_and_free() {
	let engine = FakeEngine::new();
	let api = engine.api();

	let items = vec!["one".to_string(), String::new(), "three".to_string()];
	{
		let list = StringList::from_items(&api, &items).unwrap();
		assert_eq!(list.len(), 3);
		assert_eq!(list.to_vec().unwrap(), items);
	}

	let stats = engine.stats();
	assert_eq!(stats.list_allocs, 1);
	assert_eq!(stats.list_frees, 1);
}

#[test]
fn test_empty_list_is_still_freed() {
	let engine = FakeEngine::new();
	let api = engine.api();
	{
		let list = StringList::from_items::<&str>(&api, &[]).unwrap();
		assert!(list.is_empty());
		assert!(list.to_vec().unwrap().is_empty());
	}
	let stats = engine.stats();
	assert_eq!(stats.list_allocs, stats.list_frees);
}

#[test]
fn test_list_freed_when_read_fails() {
	let engine = FakeEngine::new();
	let api = engine.api();
	let list = StringList::new(&api).unwrap();
	engine.append_raw_units(list.as_raw(), &[0xDC00]);

	let err = list.to_vec().unwrap_err();
	assert!(matches!(err, Error::InvalidUtf16(_)));
	drop(list);

	let stats = engine.stats();
	assert_eq!(stats.list_allocs, stats.list_frees);
}

#[test]
fn test_read_borrowed_null_list() {
	let engine = FakeEngine::new();
	let api = engine.api();
	let items = unsafe { read_string_list(&api, std::ptr::null_mut()) }.unwrap();
	assert!(items.is_empty());
}

#[test]
fn test_map_preserves_order() {
	let engine = FakeEngine::new();
	let api = engine.api();
	{
		let map = StringMap::from_map(&api, [("b", "2"), ("a", "1"), ("c", "3")]).unwrap();
		assert_eq!(map.len(), 3);
		assert_eq!(map.get("a").unwrap().as_deref(), Some("1"));
		assert_eq!(map.get("missing").unwrap(), None);

		let read = map.to_map().unwrap();
		let keys: Vec<_> = read.keys().cloned().collect();
		assert_eq!(keys, ["b", "a", "c"]);
	}
	let stats = engine.stats();
	assert_eq!(stats.map_allocs, 1);
	assert_eq!(stats.map_frees, 1);
}

#[test]
fn test_rejected_entries_fail_the_build() {
	let engine = FakeEngine::new();
	let api = engine.api();

	let err = StringMap::from_map(&api, [("a", "1"), ("", "2")]).err().expect("empty key is rejected");
	assert!(matches!(
		&err,
		Error::EntryRejected {
			collection: "StringMap",
			key,
		} if key.is_empty()
	));
	assert!(err.is_marshal());

	let mut headers: IndexMap<String, Vec<String>> = IndexMap::new();
	headers.insert(String::new(), vec!["orphan".into()]);
	assert!(matches!(
		StringMultimap::from_map(&api, &headers),
		Err(Error::EntryRejected {
			collection: "StringMultimap",
			..
		})
	));
	assert!(StringMultimap::from_pairs(&api, [("", "x")]).is_err());

	// The partially built collections are still freed.
	let stats = engine.stats();
	assert_eq!(stats.map_allocs, stats.map_frees);
	assert_eq!(stats.multimap_allocs, stats.multimap_frees);
}

#[test]
fn test_multimap_keeps_repeated_keys() {
	let engine = FakeEngine::new();
	let api = engine.api();

	let mut headers: IndexMap<String, Vec<String>> = IndexMap::new();
	headers.insert(
		"Accept".into(),
		vec!["text/html".into(), "application/json".into()],
	);
	headers.insert("X-Trace".into(), vec!["abc".into()]);
	{
		let map = StringMultimap::from_map(&api, &headers).unwrap();
		assert_eq!(map.len(), 3);
		assert_eq!(
			map.get_all("Accept").unwrap(),
			["text/html", "application/json"]
		);
		assert_eq!(map.to_map().unwrap(), headers);
	}
	{
		let map = StringMultimap::from_pairs(&api, [("k", "1"), ("j", "x"), ("k", "2")]).unwrap();
		let read = map.to_map().unwrap();
		assert_eq!(read["k"], ["1", "2"]);
		assert_eq!(read.get_index(1).map(|(k, _)| k.as_str()), Some("j"));
	}
	let stats = engine.stats();
	assert_eq!(stats.multimap_allocs, 2);
	assert_eq!(stats.multimap_frees, 2);
}
