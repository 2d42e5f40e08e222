//! Minimal helpers for the rendered job log markup.
//!
//! Job log lines are flat sequences of `<span>` elements, so a full HTML
//! parser is not needed: these helpers only find element boundaries and
//! translate the handful of entities the log renderer emits.

use regex::Regex;
use std::sync::LazyLock;

static LINE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\b[^>]*\bline-number\b[^>]*>\s*(?P<number>[0-9]+)\s*</a>"#)
        .expect("line number pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Escape text for inclusion in markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the entities produced by [`escape`] and the job log renderer.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Visible text of a markup fragment, tags removed and entities decoded.
pub fn text_content(markup: &str) -> String {
    decode_entities(&TAG.replace_all(markup, ""))
}

/// Text of the first element of a markup fragment.
///
/// Leading text before any element counts as the first node. Returns the
/// whole fragment's text when it holds no elements.
pub fn first_text_node(markup: &str) -> String {
    let trimmed = markup.trim_start();
    if !trimmed.starts_with('<') {
        let end = trimmed.find('<').unwrap_or(trimmed.len());
        return decode_entities(&trimmed[..end]);
    }

    let Some(open_end) = trimmed.find('>') else {
        return text_content(trimmed);
    };
    let inner = &trimmed[open_end + 1..];
    let close = inner.find("</").unwrap_or(inner.len());
    text_content(&inner[..close])
}

/// Split a GitLab line-number anchor off a rendered line.
///
/// Returns the anchor's number and the line with the anchor removed, or
/// `None` when the line carries no anchor.
pub fn split_line_number(line: &str) -> Option<(u64, String)> {
    let caps = LINE_NUMBER.captures(line)?;
    let number = caps.name("number")?.as_str().parse().ok()?;
    let whole = caps.get(0)?;
    let mut rest = String::with_capacity(line.len() - whole.len());
    rest.push_str(&line[..whole.start()]);
    rest.push_str(&line[whole.end()..]);
    Some((number, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_and_decode() {
        let raw = r#"module.db["primary"] <a & b>"#;
        let escaped = escape(raw);
        assert_eq!(
            escaped,
            "module.db[&quot;primary&quot;] &lt;a &amp; b&gt;"
        );
        assert_eq!(decode_entities(&escaped), raw);
    }

    #[test]
    fn test_decode_does_not_double_decode() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_text_content() {
        let line = r#"<span class="a">  # aws_instance.web</span><span class="b"> will be created</span>"#;
        assert_eq!(text_content(line), "  # aws_instance.web will be created");
    }

    #[test]
    fn test_first_text_node() {
        let line = r#"<span class="term-bold">  # aws_instance.web</span><span> will be created</span>"#;
        assert_eq!(first_text_node(line), "  # aws_instance.web");

        assert_eq!(first_text_node("plain text<span>x</span>"), "plain text");
        assert_eq!(first_text_node("no markup at all"), "no markup at all");
        assert_eq!(first_text_node("<span>unterminated"), "unterminated");
    }

    #[test]
    fn test_split_line_number() {
        let line = r##"<div class="js-line log-line"><a id="L42" href="#L42" class="gl-link d-inline-block text-right line-number flex-shrink-0">42</a><span>text</span></div>"##;
        let (number, rest) = split_line_number(line).unwrap();
        assert_eq!(number, 42);
        assert_eq!(rest, r#"<div class="js-line log-line"><span>text</span></div>"#);
    }

    #[test]
    fn test_split_line_number_absent() {
        assert!(split_line_number("<span>text</span>").is_none());
        assert!(split_line_number(r#"<a href="x">42</a>"#).is_none());
    }
}
