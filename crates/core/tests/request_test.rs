// Integration tests for the request proxy: fields, headers and identity.

mod common;

use cef::{Ownership, Request};
use common::{assert_clean, setup};
use indexmap::IndexMap;

#[test]
fn test_request_fields() {
	let (engine, rt) = setup();
	{
		let request = Request::create(&rt).expect("create request");
		assert!(!request.is_read_only().unwrap());
		assert_eq!(request.method().unwrap().as_deref(), Some("GET"));

		request.set_url("https://example.com/index.html").unwrap();
		request.set_method("POST").unwrap();
		assert_eq!(request.url().unwrap().as_deref(), Some("https://example.com/index.html"));
		assert_eq!(request.method().unwrap().as_deref(), Some("POST"));

		let other = Request::create(&rt).unwrap();
		assert_ne!(request.identifier().unwrap(), 0);
		assert_ne!(request.identifier().unwrap(), other.identifier().unwrap());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_header_lookup_is_case_insensitive() {
	let (engine, rt) = setup();
	{
		let request = Request::create(&rt).unwrap();
		request.set_header_by_name("Content-Type", "text/plain", false).unwrap();
		assert_eq!(request.header_by_name("content-type").unwrap().as_deref(), Some("text/plain"));

		// Without overwrite the existing value wins.
		request.set_header_by_name("CONTENT-TYPE", "text/html", false).unwrap();
		assert_eq!(request.header_by_name("Content-Type").unwrap().as_deref(), Some("text/plain"));

		request.set_header_by_name("content-type", "text/html", true).unwrap();
		assert_eq!(request.header_by_name("Content-Type").unwrap().as_deref(), Some("text/html"));
		assert_eq!(request.header_by_name("Accept").unwrap(), None);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_header_map_groups_repeated_names() {
	let (engine, rt) = setup();
	{
		let request = Request::create(&rt).unwrap();
		let mut headers = IndexMap::new();
		headers.insert("Accept".to_string(), vec!["text/html".to_string()]);
		headers.insert(
			"Cookie".to_string(),
			vec!["a=1".to_string(), "b=2".to_string()],
		);
		request.set_header_map(&headers).unwrap();

		let read = request.header_map().unwrap();
		assert_eq!(read, headers);
		assert_eq!(read.keys().collect::<Vec<_>>(), ["Accept", "Cookie"]);
		assert_eq!(request.header_by_name("cookie").unwrap().as_deref(), Some("a=1"));
	}
	let stats = engine.stats();
	assert_eq!(stats.multimap_allocs, stats.multimap_frees);
	assert_clean(&engine, 0);
}

#[test]
fn test_read_only_request_ignores_setters() {
	let (engine, rt) = setup();
	{
		let ptr = engine.read_only_request("https://example.com/");
		let request = unsafe { Request::from_native_owned(&rt, ptr) }.unwrap();
		assert!(request.is_read_only().unwrap());

		request.set_url("https://other.example/").unwrap();
		request.set_header_by_name("X-Test", "1", true).unwrap();
		assert_eq!(request.url().unwrap().as_deref(), Some("https://example.com/"));
		assert!(request.header_map().unwrap().is_empty());
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_wrapping_same_request_yields_same_instance() {
	let (engine, rt) = setup();
	{
		let request = Request::create(&rt).unwrap();
		let ptr = request.to_native().unwrap();

		// A pointer lent during a callback resolves to the cached owner.
		let lent = unsafe { Request::from_native(&rt, ptr) }.unwrap();
		assert!(lent.handle().same_instance(request.handle()));
		assert_eq!(lent.ownership(), Ownership::Owned);
		assert_eq!(lent, request);
		assert_eq!(rt.registry().len(), 1);
	}
	assert!(rt.registry().is_empty());
	assert_clean(&engine, 0);
}
