//! Point lookups that read a container without iterating all of it.

use std::cmp::Ordering;

use jsonb_util::obj_key_cmp;

use crate::compare::scalar_eq;
use crate::container::Container;
use crate::error::{JsonbError, Result};
use crate::value::Value;

/// First array element equal to the scalar `target`.
///
/// Returns `None` when `container` is an object, when `target` is not a
/// scalar, or when nothing matches.
pub fn find_in_array<'a>(container: &Container<'a>, target: &Value<'_>) -> Result<Option<Value<'a>>> {
    if !container.is_array() || !target.is_scalar() {
        return Ok(None);
    }
    let mut offset = 0;
    for index in 0..container.len() {
        let candidate = container.decode_child(index, offset)?;
        if scalar_eq(&candidate, target) {
            return Ok(Some(candidate));
        }
        offset = container.entry(index)?.advance_offset(offset);
    }
    Ok(None)
}

/// Value stored under `key`, found by binary search over the sorted key
/// descriptors. `None` for arrays and for absent keys.
pub fn find_key_in_object<'a>(container: &Container<'a>, key: &[u8]) -> Result<Option<Value<'a>>> {
    if !container.is_object() {
        return Ok(None);
    }
    let n = container.len();
    let (mut lo, mut hi) = (0usize, n);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let offset = container.start_offset(mid)?;
        let candidate = match container.decode_child(mid, offset)? {
            Value::String(k) => k,
            _ => return Err(JsonbError::NonStringKey(mid)),
        };
        match obj_key_cmp(&candidate, key) {
            Ordering::Equal => return container.child(mid + n).map(Some),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    Ok(None)
}

/// Element `index` of an array, `None` past the end.
pub fn get_by_index<'a>(container: &Container<'a>, index: usize) -> Result<Option<Value<'a>>> {
    if !container.is_array() {
        return Err(JsonbError::NotAnArray);
    }
    if index >= container.len() {
        return Ok(None);
    }
    container.child(index).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;

    #[test]
    fn binary_search_by_key() {
        let pairs: Vec<(String, Value<'_>)> = (0..80)
            .map(|i| (format!("key{i}"), Value::from(i as i64)))
            .collect();
        let v = Value::object(
            pairs
                .iter()
                .map(|(k, v)| (k.as_bytes(), v.clone()))
                .collect(),
        );
        let jb = assemble(&v).unwrap();
        let c = jb.as_container();
        for i in 0..80 {
            let key = format!("key{i}");
            assert_eq!(
                find_key_in_object(&c, key.as_bytes()).unwrap(),
                Some(Value::from(i as i64)),
                "{key}"
            );
        }
        assert_eq!(find_key_in_object(&c, b"key80").unwrap(), None);
        assert_eq!(find_key_in_object(&c, b"").unwrap(), None);
    }

    #[test]
    fn object_lookup_on_array_misses() {
        let jb = assemble(&Value::array(vec![Value::str("a")])).unwrap();
        assert_eq!(find_key_in_object(&jb.as_container(), b"a").unwrap(), None);
    }

    #[test]
    fn nested_values_come_back_binary() {
        let v = Value::object(vec![(&b"a"[..], Value::array(vec![Value::from(1)]))]);
        let jb = assemble(&v).unwrap();
        match find_key_in_object(&jb.as_container(), b"a").unwrap() {
            Some(Value::Binary(inner)) => {
                assert_eq!(get_by_index(&inner, 0).unwrap(), Some(Value::from(1)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn array_scan() {
        let v = Value::array(vec![
            Value::str("x"),
            Value::array(vec![]),
            Value::from(3),
            Value::from(false),
        ]);
        let jb = assemble(&v).unwrap();
        let c = jb.as_container();
        assert_eq!(find_in_array(&c, &Value::from(3)).unwrap(), Some(Value::from(3)));
        assert_eq!(find_in_array(&c, &Value::from(false)).unwrap(), Some(Value::from(false)));
        assert_eq!(find_in_array(&c, &Value::Null).unwrap(), None);
        assert_eq!(find_in_array(&c, &Value::str("y")).unwrap(), None);
        assert_eq!(find_in_array(&c, &Value::array(vec![])).unwrap(), None);
    }

    #[test]
    fn array_scan_on_object_misses() {
        let jb = assemble(&Value::object(vec![(&b"a"[..], Value::Null)])).unwrap();
        assert_eq!(find_in_array(&jb.as_container(), &Value::Null).unwrap(), None);
    }

    #[test]
    fn indexed_access() {
        let jb = assemble(&Value::array(vec![Value::str("a"), Value::str("b")])).unwrap();
        let c = jb.as_container();
        assert_eq!(get_by_index(&c, 1).unwrap(), Some(Value::str("b")));
        assert_eq!(get_by_index(&c, 2).unwrap(), None);

        let obj = assemble(&Value::object(vec![(&b"a"[..], Value::Null)])).unwrap();
        assert_eq!(get_by_index(&obj.as_container(), 0), Err(JsonbError::NotAnArray));
    }
}
