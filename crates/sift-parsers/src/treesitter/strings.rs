//! String literal decoding and docstring normalisation.

/// Prefix flags of a string literal (`rb"..."`, `f'...'`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StringPrefix {
    pub raw: bool,
    pub bytes: bool,
    pub format: bool,
}

impl StringPrefix {
    /// Parse the `string_start` token, e.g. `rb'''`.
    pub(crate) fn from_start_token(token: &str) -> Self {
        let letters = token.trim_end_matches(['"', '\'']);
        let mut prefix = StringPrefix::default();
        for c in letters.chars() {
            match c.to_ascii_lowercase() {
                'r' => prefix.raw = true,
                'b' => prefix.bytes = true,
                'f' => prefix.format = true,
                _ => {}
            }
        }
        prefix
    }
}

/// Decode the body of one `string_content` chunk.
pub(crate) fn decode_content(raw: &str, prefix: StringPrefix) -> String {
    let text = if prefix.raw {
        raw.to_string()
    } else {
        decode_escapes(raw)
    };
    if prefix.format {
        text.replace("{{", "{").replace("}}", "}")
    } else {
        text
    }
}

fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            'x' => push_hex(&mut out, &mut chars, 2, "\\x"),
            'u' => push_hex(&mut out, &mut chars, 4, "\\u"),
            'U' => push_hex(&mut out, &mut chars, 8, "\\U"),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\u{fffd}'));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_hex(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    width: usize,
    escape: &str,
) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.peek() {
            Some(d) if d.is_ascii_hexdigit() => {
                digits.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = if digits.len() == width {
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    } else {
        None
    };
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push_str(escape);
            out.push_str(&digits);
        }
    }
}

/// Normalise a docstring the way Python's `inspect.cleandoc` does: expand
/// tabs, strip the first line, remove the common indentation of the rest, and
/// drop leading/trailing blank lines. Returns `None` when nothing is left.
pub fn clean_docstring(doc: &str) -> Option<String> {
    let expanded: Vec<String> = doc.split('\n').map(expand_tabs).collect();
    let margin = expanded
        .iter()
        .skip(1)
        .filter(|l| !l.trim_start().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut lines: Vec<&str> = Vec::with_capacity(expanded.len());
    for (i, line) in expanded.iter().enumerate() {
        if i == 0 {
            lines.push(line.trim_start());
        } else {
            lines.push(line.get(margin..).unwrap_or("").trim_end());
        }
    }
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            let pad = 8 - (out.chars().count() % 8);
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            out.push(c);
        }
    }
    out
}
