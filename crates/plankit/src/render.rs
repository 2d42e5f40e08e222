//! Render synthesized lines as job log markup.
//!
//! The produced elements follow the job log's own line convention: an `L<n>`
//! anchor carrying the line number (so lines can be deep-linked) followed by
//! `term-fg-*` styled spans.

use crate::markup::escape;
use crate::synthesize::SEPARATOR;
use crate::types::{SynthesizedLine, Tone};

const SPAN_CLASS: &str = "gl-white-space-pre-wrap";

/// Render one synthesized line as a `js-line log-line` element.
pub fn markup_line(line: &SynthesizedLine) -> String {
    let n = line.index;
    let mut out = format!(
        r##"<div class="js-line log-line"><a id="L{n}" href="#L{n}" class="gl-link d-inline-block text-right line-number flex-shrink-0">{n}</a>"##
    );

    if let Some(indent) = line.indent {
        out.push_str(&span(&tone_class(indent.tone, false), &indent.glyph.to_string()));
    }

    let text_class = match line.tone {
        Tone::Plain => SPAN_CLASS.to_string(),
        tone => tone_class(tone, true),
    };
    out.push_str(&span(&text_class, &line.text));

    if line.trailing_separator {
        out.push_str(&span(SPAN_CLASS, SEPARATOR));
    }

    out.push_str("</div>");
    out
}

/// Class list for a tone; summary text uses the light bold variant.
fn tone_class(tone: Tone, emphasized: bool) -> String {
    match tone.color_name() {
        Some(color) if emphasized => format!("{SPAN_CLASS} term-fg-l-{color} term-bold"),
        Some(color) => format!("{SPAN_CLASS} term-fg-{color}"),
        None => SPAN_CLASS.to_string(),
    }
}

fn span(class: &str, text: &str) -> String {
    format!(r#"<span class="{class}">{}</span>"#, escape(text))
}
