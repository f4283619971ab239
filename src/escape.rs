const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `bytes` as a quoted JSON string.
///
/// Escaping is per byte: `"` and `\` are backslash-escaped, control bytes
/// `0x00..=0x1F` become `\u00xx`, everything else is copied through.
pub(crate) fn write_quoted(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.reserve(bytes.len() + 2);
    buf.push(b'"');

    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'"' && b != b'\\' && b > 0x1f {
            continue;
        }

        buf.extend_from_slice(&bytes[start..i]);
        start = i + 1;

        match b {
            b'"' => buf.extend_from_slice(br#"\""#),
            b'\\' => buf.extend_from_slice(br"\\"),
            _ => buf.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(b >> 4)],
                HEX[usize::from(b & 0xf)],
            ]),
        }
    }

    buf.extend_from_slice(&bytes[start..]);
    buf.push(b'"');
}

/// Appends an already valid JSON value without its insignificant control
/// whitespace.
///
/// Leading and trailing whitespace is trimmed, and tab, LF and CR outside
/// string literals are dropped. Interior spaces and string contents are
/// copied unchanged.
pub(crate) fn write_embedded(buf: &mut Vec<u8>, bytes: &[u8]) {
    let start = bytes
        .iter()
        .position(|b| !is_json_whitespace(*b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !is_json_whitespace(*b))
        .map_or(start, |i| i + 1);
    let value = &bytes[start..end];
    buf.reserve(value.len());

    let mut in_string = false;
    let mut escaped = false;
    let mut run = 0;
    for (i, &b) in value.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
        } else if b == b'"' {
            in_string = true;
        } else if matches!(b, b'\t' | b'\n' | b'\r') {
            buf.extend_from_slice(&value[run..i]);
            run = i + 1;
        }
    }

    buf.extend_from_slice(&value[run..]);
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
