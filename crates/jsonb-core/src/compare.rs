//! Total order over encoded containers.
//!
//! Two non-skipping iterators are walked in lockstep and the first token
//! pair that differs decides. Containers are ranked at their `Begin` token,
//! so `End` tokens never contribute.

use std::cmp::Ordering;

use jsonb_util::obj_key_cmp;

use crate::container::Container;
use crate::error::Result;
use crate::event::Event;
use crate::value::{Kind, Value};

/// Compares two containers.
///
/// Cross-kind order is `Null < String < Number < Bool < Array < Object`.
/// Between two arrays the raw-scalar wrapper sorts first, otherwise the one
/// with fewer elements; between two objects the one with fewer pairs.
/// Same-kind scalars compare by value. Equal element counts fall through to
/// the children in storage order.
pub fn compare(a: &Container<'_>, b: &Container<'_>) -> Result<Ordering> {
    let mut ita = a.iter();
    let mut itb = b.iter();
    loop {
        let ea = ita.next_event()?;
        let eb = itb.next_event()?;
        let ord = match (&ea, &eb) {
            (Event::Done, Event::Done) => return Ok(Ordering::Equal),
            (Event::EndArray, Event::EndArray) | (Event::EndObject, Event::EndObject) => {
                Ordering::Equal
            }
            (
                Event::BeginArray {
                    len: la,
                    raw_scalar: ra,
                },
                Event::BeginArray {
                    len: lb,
                    raw_scalar: rb,
                },
            ) => {
                if ra != rb {
                    if *ra {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                } else {
                    la.cmp(lb)
                }
            }
            (Event::BeginObject { len: la }, Event::BeginObject { len: lb }) => la.cmp(lb),
            (Event::Key(ka), Event::Key(kb)) => obj_key_cmp(ka, kb),
            (Event::Elem(va), Event::Elem(vb)) | (Event::Value(va), Event::Value(vb)) => {
                compare_scalars(va, vb)
            }
            // Differing tokens: a scalar met a container, or two containers
            // of different kinds.
            _ => event_kind(&ea).cmp(&event_kind(&eb)),
        };
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
}

fn event_kind(event: &Event<'_>) -> Option<Kind> {
    match event {
        Event::BeginArray { .. } => Some(Kind::Array),
        Event::BeginObject { .. } => Some(Kind::Object),
        Event::Key(_) => Some(Kind::String),
        Event::Elem(v) | Event::Value(v) => Some(v.kind()),
        Event::EndArray | Event::EndObject | Event::Done => None,
    }
}

/// Orders two scalar values: by kind first, then by value within a kind.
///
/// Strings order by byte length, then bytewise; numbers numerically;
/// `false < true`. Non-scalar operands only compare by kind.
pub fn compare_scalars(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::String(x), Value::String(y)) => obj_key_cmp(x, y),
        (Value::Number(x), Value::Number(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.kind().cmp(&b.kind()),
    }
}

/// Same-kind scalar equality. Containers are never equal here.
pub fn scalar_eq(a: &Value<'_>, b: &Value<'_>) -> bool {
    a.is_scalar() && a.kind() == b.kind() && compare_scalars(a, b) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::container::Jsonb;
    use crate::numeric::Numeric;

    fn jb(v: Value<'_>) -> Jsonb {
        assemble(&v).unwrap()
    }

    fn cmp(a: &Jsonb, b: &Jsonb) -> Ordering {
        compare(&a.as_container(), &b.as_container()).unwrap()
    }

    #[test]
    fn scalar_order() {
        assert_eq!(compare_scalars(&Value::str("b"), &Value::str("aa")), Ordering::Less);
        assert_eq!(compare_scalars(&Value::str("ab"), &Value::str("aa")), Ordering::Greater);
        assert_eq!(compare_scalars(&Value::from(false), &Value::from(true)), Ordering::Less);
        assert_eq!(compare_scalars(&Value::Null, &Value::str("")), Ordering::Less);
        assert_eq!(compare_scalars(&Value::from(10), &Value::from(true)), Ordering::Less);
        let x: Numeric = "1.50".parse().unwrap();
        let y: Numeric = "1.5".parse().unwrap();
        assert!(scalar_eq(&Value::Number(x), &Value::Number(y)));
        assert!(!scalar_eq(&Value::Null, &Value::from(false)));
    }

    #[test]
    fn kind_precedence_across_containers() {
        let ordered = [
            jb(Value::Null),
            jb(Value::str("s")),
            jb(Value::from(1)),
            jb(Value::from(false)),
            jb(Value::array(vec![])),
            jb(Value::object::<&[u8]>(vec![])),
        ];
        for w in ordered.windows(2) {
            assert_eq!(cmp(&w[0], &w[1]), Ordering::Less);
            assert_eq!(cmp(&w[1], &w[0]), Ordering::Greater);
        }
    }

    #[test]
    fn raw_scalar_sorts_before_array() {
        let raw = jb(Value::from(5));
        let arr = jb(Value::array(vec![Value::from(5)]));
        assert_eq!(cmp(&raw, &arr), Ordering::Less);
        let empty = jb(Value::array(vec![]));
        assert_eq!(cmp(&raw, &empty), Ordering::Less);
    }

    #[test]
    fn fewer_children_first() {
        let short = jb(Value::array(vec![Value::from(9)]));
        let long = jb(Value::array(vec![Value::from(1), Value::from(2)]));
        assert_eq!(cmp(&short, &long), Ordering::Less);
        let o1 = jb(Value::object(vec![(&b"z"[..], Value::Null)]));
        let o2 = jb(Value::object(vec![(&b"a"[..], Value::Null), (&b"b"[..], Value::Null)]));
        assert_eq!(cmp(&o1, &o2), Ordering::Less);
    }

    #[test]
    fn children_decide_in_order() {
        let a = jb(Value::object(vec![(&b"a"[..], Value::from(1))]));
        let b = jb(Value::object(vec![(&b"b"[..], Value::from(0))]));
        assert_eq!(cmp(&a, &b), Ordering::Less);

        let nested = jb(Value::array(vec![Value::array(vec![]), Value::from(1)]));
        let scalar = jb(Value::array(vec![Value::from(1), Value::from(1)]));
        assert_eq!(cmp(&scalar, &nested), Ordering::Less);
    }

    #[test]
    fn equal_containers() {
        let a = jb(Value::object(vec![
            (&b"k"[..], Value::array(vec![Value::str("x"), Value::Null])),
            (&b"n"[..], Value::number("2.0".parse::<Numeric>().unwrap())),
        ]));
        let b = jb(Value::object(vec![
            (&b"n"[..], Value::from(2)),
            (&b"k"[..], Value::array(vec![Value::str("x"), Value::Null])),
        ]));
        assert_eq!(cmp(&a, &b), Ordering::Equal);
    }
}
