use std::cmp::Ordering;

use jsonb_core::json::{from_json, to_json};
use jsonb_core::{
    assemble, build, compare, find_key_in_object, get_by_index, BuilderOptions, Event, Jsonb,
    JsonbError, Token, Value,
};
use serde_json::json;

#[test]
fn object_from_events() {
    let events = vec![
        Event::begin_object(),
        Event::key("b"),
        Event::Value(Value::from(2)),
        Event::key("a"),
        Event::Value(Value::from(1)),
        Event::EndObject,
    ];
    let jb = assemble(&build(events, BuilderOptions::default()).unwrap()).unwrap();
    let c = jb.as_container();
    assert!(c.is_object());
    assert_eq!(c.len(), 2);
    assert_eq!(c.child(0).unwrap(), Value::str("a"));
    assert_eq!(c.child(1).unwrap(), Value::str("b"));
    assert_eq!(find_key_in_object(&c, b"a").unwrap(), Some(Value::from(1)));
    assert_eq!(find_key_in_object(&c, b"b").unwrap(), Some(Value::from(2)));
    assert_eq!(find_key_in_object(&c, b"c").unwrap(), None);

    let direct = Jsonb::from_json(&json!({"a": 1, "b": 2}), BuilderOptions::default()).unwrap();
    assert_eq!(compare(&c, &direct.as_container()).unwrap(), Ordering::Equal);

    let tokens: Vec<Token> = c.iter().map(|e| e.unwrap().token()).collect();
    assert_eq!(
        tokens,
        [
            Token::BeginObject,
            Token::Key,
            Token::Value,
            Token::Key,
            Token::Value,
            Token::EndObject
        ]
    );
}

#[test]
fn duplicate_keys_keep_the_last() {
    let jb = Jsonb::from_json(&json!({"a": 1}), BuilderOptions::default()).unwrap();
    let events = vec![
        Event::begin_object(),
        Event::key("a"),
        Event::Value(Value::from(1)),
        Event::key("a"),
        Event::Value(Value::from(2)),
        Event::EndObject,
    ];
    let dup = assemble(&build(events.clone(), BuilderOptions::default()).unwrap()).unwrap();
    assert_eq!(dup.to_json().unwrap(), json!({"a": 2}));
    assert_eq!(
        compare(&dup.as_container(), &jb.as_container()).unwrap(),
        Ordering::Greater
    );

    let strict = BuilderOptions {
        unique_keys: true,
        ..Default::default()
    };
    assert_eq!(build(events, strict), Err(JsonbError::DuplicateKey));
}

#[test]
fn raw_scalar_round_trip() {
    let jb = from_json(&json!("x"), BuilderOptions::default()).unwrap();
    let c = jb.as_container();
    assert!(c.is_array() && c.is_scalar());
    assert_eq!(c.extract_scalar().unwrap(), Some(Value::str("x")));
    assert_eq!(to_json(&c).unwrap(), json!("x"));
    assert_eq!(get_by_index(&c, 0).unwrap(), Some(Value::str("x")));
}

#[test]
fn nested_lookup_chain() {
    let doc = json!({"user": {"tags": ["x", "y"], "id": 7}});
    let jb = from_json(&doc, BuilderOptions::default()).unwrap();
    let Some(Value::Binary(user)) = find_key_in_object(&jb.as_container(), b"user").unwrap() else {
        panic!("user should be a nested container");
    };
    let Some(Value::Binary(tags)) = find_key_in_object(&user, b"tags").unwrap() else {
        panic!("tags should be a nested container");
    };
    assert_eq!(get_by_index(&tags, 1).unwrap(), Some(Value::str("y")));
    assert_eq!(find_key_in_object(&user, b"id").unwrap(), Some(Value::from(7)));
}

#[test]
fn binary_values_rebuild_canonically() {
    let inner = from_json(&json!({"z": 1, "a": [true]}), BuilderOptions::default()).unwrap();
    let events = vec![
        Event::begin_array(),
        Event::Elem(Value::Binary(inner.as_container())),
        Event::Elem(Value::from(3)),
        Event::EndArray,
    ];
    let jb = assemble(&build(events, BuilderOptions::default()).unwrap()).unwrap();
    assert_eq!(jb.to_json().unwrap(), json!([{"a": [true], "z": 1}, 3]));
}

#[test]
fn skip_nulls_after_dedup() {
    let events = vec![
        Event::begin_object(),
        Event::key("a"),
        Event::Value(Value::from(1)),
        Event::key("a"),
        Event::Value(Value::Null),
        Event::key("b"),
        Event::Value(Value::from(false)),
        Event::EndObject,
    ];
    let opts = BuilderOptions {
        skip_nulls: true,
        ..Default::default()
    };
    let jb = assemble(&build(events, opts).unwrap()).unwrap();
    assert_eq!(jb.to_json().unwrap(), json!({"b": false}));
}

#[test]
fn truncated_buffer_is_an_error() {
    let jb = from_json(&json!({"key": ["value", 12.5]}), BuilderOptions::default()).unwrap();
    let bytes = jb.as_bytes();
    for cut in 0..bytes.len() {
        let short = bytes[..cut].to_vec();
        match Jsonb::from_bytes(short) {
            Err(e) => assert!(e.is_format_violation(), "cut {cut}: {e}"),
            Ok(partial) => assert!(partial.validate().is_err(), "cut {cut}"),
        }
    }
    assert!(jb.validate().is_ok());
}
