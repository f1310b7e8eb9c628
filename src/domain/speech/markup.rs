//! Markup repair for speech fragments.
//!
//! Application strings end up inside a `<speak>` envelope, so a stray `&`,
//! an unclosed `<emphasis>` or a nested `<speak>` would make the whole
//! response invalid. [`repair`] rewrites a fragment into well-formed markup.

use std::fmt::Write;

const ENVELOPE_TAG: &str = "speak";

#[derive(Debug, PartialEq)]
enum Tag<'a> {
    Open { name: &'a str, raw: &'a str },
    Close { name: &'a str },
    SelfClosing { name: &'a str, raw: &'a str },
    Ignored,
}

/// Rewrites `input` into balanced, escaped markup.
///
/// - unclosed tags are closed at the end, innermost first
/// - closing an outer tag first closes the tags opened inside it
/// - closing tags that were never opened are dropped
/// - `<speak>` wrappers, comments and declarations are removed
/// - a bare `&` becomes `&amp;`, a `<` that starts no tag becomes `&lt;`
pub fn repair(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut open: Vec<&str> = Vec::new();
    let mut rest = input;

    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with('&') {
            out.push_str(if is_entity(tail) { "&" } else { "&amp;" });
            rest = &tail[1..];
            continue;
        }

        match parse_tag(tail) {
            Some((tag, consumed)) => {
                apply(tag, &mut open, &mut out);
                rest = &tail[consumed..];
            }
            None => {
                out.push_str("&lt;");
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    while let Some(name) = open.pop() {
        let _ = write!(out, "</{}>", name);
    }
    out
}

/// Removes all tags and decodes the basic entities, leaving plain text.
pub fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn apply<'a>(tag: Tag<'a>, open: &mut Vec<&'a str>, out: &mut String) {
    match tag {
        Tag::Open { name, .. } | Tag::Close { name } | Tag::SelfClosing { name, .. }
            if name.eq_ignore_ascii_case(ENVELOPE_TAG) => {}
        Tag::Open { name, raw } => {
            open.push(name);
            out.push_str(raw);
        }
        Tag::Close { name } => {
            if let Some(depth) = open.iter().rposition(|n| *n == name) {
                while open.len() > depth {
                    if let Some(inner) = open.pop() {
                        let _ = write!(out, "</{}>", inner);
                    }
                }
            }
        }
        Tag::SelfClosing { raw, .. } => out.push_str(raw),
        Tag::Ignored => {}
    }
}

/// Parses the tag at the start of `tail` (which begins with `<`).
/// Returns the tag and the number of bytes it spans.
fn parse_tag(tail: &str) -> Option<(Tag<'_>, usize)> {
    let end = tail.find('>')?;
    let inner = &tail[1..end];
    let raw = &tail[..=end];

    let tag = if let Some(closing) = inner.strip_prefix('/') {
        Tag::Close {
            name: tag_name(closing)?,
        }
    } else if inner.starts_with('!') || inner.starts_with('?') {
        Tag::Ignored
    } else if let Some(body) = inner.strip_suffix('/') {
        Tag::SelfClosing {
            name: tag_name(body)?,
            raw,
        }
    } else {
        Tag::Open {
            name: tag_name(inner)?,
            raw,
        }
    };
    Some((tag, end + 1))
}

fn tag_name(body: &str) -> Option<&str> {
    if body.starts_with(char::is_whitespace) {
        return None;
    }
    let name = body.split_whitespace().next()?;
    let mut chars = name.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.'));
    valid.then_some(name)
}

fn is_entity(tail: &str) -> bool {
    let body = &tail[1..];
    let Some(semi) = body.find(';') else {
        return false;
    };
    if semi == 0 || semi > 10 {
        return false;
    }
    let name = &body[..semi];
    match name.strip_prefix('#') {
        Some(num) => match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        },
        None => name.chars().all(|c| c.is_ascii_alphanumeric()),
    }
}
