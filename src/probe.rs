//! "Is this cell already JSON?" predicates.

use serde::de::IgnoredAny;

/// Decides whether a cell's raw bytes may be embedded verbatim.
///
/// A probe that answers `true` for bytes that are not valid JSON makes the
/// encoder produce an invalid document, so custom probes must only trade
/// recall for speed, never precision.
pub trait JsonProbe {
    fn looks_like_json(&self, bytes: &[u8]) -> bool;
}

/// Full parse of the cell with `serde_json`, discarding the value.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictJson;

impl JsonProbe for StrictJson {
    fn looks_like_json(&self, bytes: &[u8]) -> bool {
        serde_json::from_slice::<IgnoredAny>(bytes).is_ok()
    }
}

/// Never recognises JSON: every non-numeric cell is quoted.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProbe;

impl JsonProbe for NoProbe {
    fn looks_like_json(&self, _bytes: &[u8]) -> bool {
        false
    }
}

impl<F> JsonProbe for F
where
    F: Fn(&[u8]) -> bool,
{
    fn looks_like_json(&self, bytes: &[u8]) -> bool {
        self(bytes)
    }
}

/// Checks the JSON number grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
pub(crate) fn is_json_number(bytes: &[u8]) -> bool {
    let mut rest = bytes.strip_prefix(b"-").unwrap_or(bytes);

    match rest {
        [b'0', tail @ ..] => rest = tail,
        [b'1'..=b'9', ..] => rest = skip_digits(rest),
        _ => return false,
    }

    if let Some(tail) = rest.strip_prefix(b".") {
        let after = skip_digits(tail);
        if after.len() == tail.len() {
            return false;
        }
        rest = after;
    }

    if let [b'e' | b'E', tail @ ..] = rest {
        let tail = tail
            .strip_prefix(b"+")
            .or_else(|| tail.strip_prefix(b"-"))
            .unwrap_or(tail);
        let after = skip_digits(tail);
        if after.len() == tail.len() {
            return false;
        }
        rest = after;
    }

    rest.is_empty()
}

fn skip_digits(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    &bytes[end..]
}

/// Objects, arrays and string literals; bare scalars are excluded.
pub(crate) fn is_structured(bytes: &[u8]) -> bool {
    matches!(
        bytes.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{' | b'[' | b'"')
    )
}
