use std::cmp::Ordering;

/// Compare two byte strings for object key ordering.
///
/// The comparison is first by length, then by lexicographic byte order.
/// Canonical objects keep their keys in this order, which lets lookups
/// binary-search them and reject most candidates on length alone.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use jsonb_util::obj_key_cmp;
///
/// assert_eq!(obj_key_cmp(b"a", b"b"), Ordering::Less);
/// assert_eq!(obj_key_cmp(b"aa", b"b"), Ordering::Greater); // "aa" is longer
/// assert_eq!(obj_key_cmp(b"a", b"a"), Ordering::Equal);
/// ```
pub fn obj_key_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let len1 = a.len();
    let len2 = b.len();

    if len1 == len2 {
        a.cmp(b)
    } else {
        len1.cmp(&len2)
    }
}
