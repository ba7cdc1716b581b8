//! Integer-array extraction straight from response bytes.
//!
//! These functions never build a JSON tree. They exist because child id lists
//! can run to hundreds of entries and are pulled out of every item response.
//!
//! Contract: the array belonging to `field` is the first `[` ... `]` pair found
//! after the first occurrence of the field name anywhere in the payload. There is
//! no nesting awareness and no validation, so a payload that mentions the field
//! name inside a string, or that has a nested array between the name and its own
//! array, gives wrong results. Callers that need correctness on adversarial input
//! should parse the document instead.

use tracing::trace;

use crate::models::ItemId;

const BEGIN_ARRAY: u8 = b'[';
const END_ARRAY: u8 = b']';
const ELEMENT_SEPARATOR: u8 = b',';

/// Scan a bracketed, comma separated list of integers.
///
/// Brackets are skipped (they are not separators), so the element before `]`
/// is flushed by the end-of-input check. Bytes other than digits and commas are
/// ignored: `[-5]` scans as `[5]` and `[[1,2],[3]]` as `[1,2,3]`. A token that
/// overflows [`ItemId`] is dropped.
pub fn scan_int_array(bytes: &[u8]) -> Vec<ItemId> {
    let mut items = Vec::new();
    let mut token: Option<ItemId> = None;
    let mut overflowed = false;

    let mut flush = |token: &mut Option<ItemId>, overflowed: &mut bool| {
        if let Some(value) = token.take() {
            if !*overflowed {
                items.push(value);
            } else {
                trace!("dropping integer token that overflows an item id");
            }
        }
        *overflowed = false;
    };

    for &byte in bytes {
        match byte {
            BEGIN_ARRAY | END_ARRAY => {}
            ELEMENT_SEPARATOR => flush(&mut token, &mut overflowed),
            b'0'..=b'9' => {
                let digit = ItemId::from(byte - b'0');
                let next = token
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit));
                match next {
                    Some(value) => token = Some(value),
                    None => {
                        overflowed = true;
                        token = Some(0);
                    }
                }
            }
            _ => {}
        }
    }
    flush(&mut token, &mut overflowed);

    items
}

/// Pull the integer array for `field` out of a raw payload.
///
/// Returns an empty list when the field name doesn't appear, or when no
/// `[` ... `]` pair follows it.
pub fn extract_int_array(field: &str, raw: &[u8]) -> Vec<ItemId> {
    let Some(field_at) = find(raw, field.as_bytes()) else {
        return Vec::new();
    };
    let rest = &raw[field_at..];

    let Some(begin) = rest.iter().position(|&b| b == BEGIN_ARRAY) else {
        return Vec::new();
    };
    let Some(len) = rest[begin..].iter().position(|&b| b == END_ARRAY) else {
        return Vec::new();
    };

    scan_int_array(&rest[begin..=begin + len])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_simple_arrays() {
        assert!(scan_int_array(b"[]").is_empty());
        assert!(scan_int_array(b"").is_empty());
        assert_eq!(scan_int_array(b"[1,2,3]"), vec![1, 2, 3]);
        assert_eq!(scan_int_array(b"[42]"), vec![42]);
    }

    #[test]
    fn ignores_whitespace_and_trailing_newline() {
        assert_eq!(
            scan_int_array(b"[ 41263185, 41262011 ,41259999 ]\n"),
            vec![41263185, 41262011, 41259999]
        );
    }

    #[test]
    fn empty_tokens_produce_nothing() {
        assert!(scan_int_array(b"[,]").is_empty());
        assert_eq!(scan_int_array(b"[1,,2,]"), vec![1, 2]);
    }

    #[test]
    fn nested_brackets_flatten() {
        assert_eq!(scan_int_array(b"[[1,2],[3]]"), vec![1, 2, 3]);
    }

    #[test]
    fn overflowing_token_is_dropped() {
        assert_eq!(scan_int_array(b"[99999999999999999999999,7]"), vec![7]);
    }

    #[test]
    fn extracts_kids_among_other_fields() {
        let raw = br#"{"by":"pg","id":1,"kids":[10,20,30],"score":57,"time":1160418111,"title":"Y Combinator","type":"story"}"#;
        assert_eq!(extract_int_array("kids", raw), vec![10, 20, 30]);
    }

    #[test]
    fn missing_field_is_empty() {
        let raw = br#"{"by":"pg","id":1,"score":57,"title":"Y Combinator"}"#;
        assert!(extract_int_array("kids", raw).is_empty());
    }

    #[test]
    fn field_without_brackets_is_empty() {
        assert!(extract_int_array("kids", br#"{"kids":null}"#).is_empty());
        assert!(extract_int_array("kids", br#"{"kids":[1,2"#).is_empty());
    }

    #[test]
    fn matches_field_name_inside_strings() {
        // Substring search, not a structural lookup.
        let raw = br#"{"text":"my kids say hi","parts":[5,6],"kids":[1]}"#;
        assert_eq!(extract_int_array("kids", raw), vec![5, 6]);
    }
}
