//! Summary synthesizer.
//!
//! Builds the lines appended after the original log: a spacer, a header,
//! then either a single mismatch alert or the per-category counts followed
//! by one detail line per affected resource.

use crate::markers::MarkerSet;
use crate::markup;
use crate::types::{
    ClassificationIndex, Dialect, Indent, LogLine, OperationCategory, ReconciliationResult,
    SynthesizedLine, Tone,
};

/// Text of the header line.
pub const HEADER_TEXT: &str =
    "Summarize Terraform Plan Result. Click the line number and move to the affected resource line.";

/// Text of the alert emitted when counts disagree.
pub const MISMATCH_TEXT: &str = "Mismatch on plan result and summarizer's expectation. \
     The resource lines no longer match the plan format, so no summary is shown!!!";

/// Glyph leading every detail line.
pub const INDENT_GLYPH: char = '│';

/// Separator written after a detail line's text.
pub const SEPARATOR: &str = " ";

/// Token preceding the resource address on an operation line.
const ADDRESS_TOKEN: &str = "# ";

/// Hands out display indices continuing the log's numbering.
struct Numbering {
    last: u64,
}

impl Numbering {
    fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

/// Synthesize the summary lines for one run.
///
/// `reconciliation` is `None` when the log holds no declaration, in which
/// case nothing is produced. Indices start at `last_index + 1`.
pub fn synthesize(
    index: &ClassificationIndex,
    reconciliation: Option<&ReconciliationResult>,
    last_index: u64,
) -> Vec<SynthesizedLine> {
    let Some(reconciliation) = reconciliation else {
        return Vec::new();
    };

    let needed = match reconciliation {
        ReconciliationResult::Mismatch { .. } => 3,
        ReconciliationResult::Validated { .. } => 2 + 4 + index.total() as u64,
    };
    if last_index.checked_add(needed).is_none() {
        log::warn!("line index {last_index} leaves no room for {needed} summary lines");
        return Vec::new();
    }

    let mut numbering = Numbering { last: last_index };
    let mut out = vec![
        text_line(numbering.next(), Tone::Positive, ""),
        text_line(numbering.next(), Tone::Info, HEADER_TEXT),
    ];

    let counts = match reconciliation {
        ReconciliationResult::Mismatch { .. } => {
            out.push(text_line(numbering.next(), Tone::Alert, MISMATCH_TEXT));
            return out;
        }
        ReconciliationResult::Validated { counts } => counts,
    };

    for category in OperationCategory::ALL {
        let count = counts.get(category);
        let tone = if category.is_destructive() && count > 0 {
            Tone::Alert
        } else {
            Tone::Positive
        };
        out.push(text_line(
            numbering.next(),
            tone,
            &format!("* {category} Count: {count}"),
        ));
    }

    let markers = MarkerSet::for_dialect(index.dialect());
    for (category, lines) in index.iter() {
        for line in lines {
            out.push(SynthesizedLine {
                index: numbering.next(),
                tone: Tone::Plain,
                indent: Some(Indent {
                    glyph: INDENT_GLYPH,
                    tone: category.indent_tone(),
                }),
                text: resource_identifier(line, &markers),
                trailing_separator: true,
            });
        }
    }

    out
}

fn text_line(index: u64, tone: Tone, text: &str) -> SynthesizedLine {
    SynthesizedLine {
        index,
        tone,
        indent: None,
        text: text.to_string(),
        trailing_separator: false,
    }
}

/// Extract the resource address from an operation line.
///
/// Only the line's first text node is considered; everything after it,
/// including the operation marker, is dropped. The address is the text
/// following `# ` when present, otherwise the whole node.
pub fn resource_identifier(line: &LogLine, markers: &MarkerSet) -> String {
    let node = match markers.dialect() {
        Dialect::Markup => markup::first_text_node(&line.content),
        Dialect::Plain | Dialect::Auto => {
            let end = markers
                .match_line(&line.content)
                .map_or(line.content.len(), |m| m.offset);
            line.content[..end].to_string()
        }
    };

    match node.split_once(ADDRESS_TOKEN) {
        Some((_, address)) => address.trim().to_string(),
        None => node.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::reconcile::reconcile;
    use crate::types::{DeclarationPolicy, DeclarationRecord};

    fn run(text: &str) -> (ClassificationIndex, Option<ReconciliationResult>) {
        let lines: Vec<_> = text
            .lines()
            .enumerate()
            .map(|(i, l)| LogLine::new(i as u64 + 1, l))
            .collect();
        let result = classify(&lines, &MarkerSet::plain(), DeclarationPolicy::Last).unwrap();
        let reconciliation = result
            .declaration
            .map(|d| reconcile(&result.index, &d));
        (result.index, reconciliation)
    }

    const VALID_PLAN: &str = "\
  # aws_instance.a will be created
  # aws_instance.b will be created
  # aws_instance.c will be updated in-place
  # aws_instance.d will be destroyed
Plan: 2 to add, 1 to change, 1 to destroy.";

    #[test]
    fn test_no_room_after_last_index() {
        let (index, reconciliation) = run(VALID_PLAN);
        assert!(synthesize(&index, reconciliation.as_ref(), u64::MAX).is_empty());
        assert!(synthesize(&index, reconciliation.as_ref(), u64::MAX - 7).is_empty());

        let out = synthesize(&index, reconciliation.as_ref(), u64::MAX - 10);
        assert_eq!(out.len(), 10);
        assert_eq!(out.last().map(|l| l.index), Some(u64::MAX));
    }

    #[test]
    fn test_no_declaration_produces_nothing() {
        let (index, reconciliation) = run("  # aws_instance.a will be created");
        assert!(reconciliation.is_none());
        assert!(synthesize(&index, reconciliation.as_ref(), 1).is_empty());
    }

    #[test]
    fn test_validated_layout() {
        let (index, reconciliation) = run(VALID_PLAN);
        let out = synthesize(&index, reconciliation.as_ref(), 5);

        assert_eq!(out.len(), 2 + 4 + index.total());
        assert_eq!(out[0].text, "");
        assert_eq!(out[1].text, HEADER_TEXT);
        assert_eq!(out[1].tone, Tone::Info);

        let counts: Vec<_> = out[2..6].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            counts,
            vec![
                "* Create Count: 2",
                "* Replace Count: 0",
                "* In-place Update Count: 1",
                "* Destroy Count: 1",
            ]
        );
        assert_eq!(out[2].tone, Tone::Positive);
        assert_eq!(out[3].tone, Tone::Positive);
        assert_eq!(out[4].tone, Tone::Positive);
        assert_eq!(out[5].tone, Tone::Alert);

        let details: Vec<_> = out[6..].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            details,
            vec![
                "aws_instance.a",
                "aws_instance.b",
                "aws_instance.c",
                "aws_instance.d"
            ]
        );
        assert_eq!(out[6].indent.unwrap().tone, Tone::Positive);
        assert_eq!(out[8].indent.unwrap().tone, Tone::Caution);
        assert_eq!(out[9].indent.unwrap().tone, Tone::Alert);
        assert!(out[6..].iter().all(|l| l.trailing_separator));
    }

    #[test]
    fn test_indices_are_contiguous() {
        let (index, reconciliation) = run(VALID_PLAN);
        let out = synthesize(&index, reconciliation.as_ref(), 41);
        let indices: Vec<_> = out.iter().map(|l| l.index).collect();
        let expected: Vec<_> = (42..42 + out.len() as u64).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_mismatch_stops_after_alert() {
        let plan = VALID_PLAN.replace("  # aws_instance.b will be created\n", "");
        let (index, reconciliation) = run(&plan);
        assert!(!reconciliation.as_ref().unwrap().is_validated());

        let out = synthesize(&index, reconciliation.as_ref(), 4);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].tone, Tone::Alert);
        assert_eq!(out[2].text, MISMATCH_TEXT);
        assert_eq!(out[2].index, 7);
    }

    #[test]
    fn test_details_follow_category_order() {
        let plan = "\
  # z.destroyed will be destroyed
  # y.updated will be updated in-place
  # x.replaced must be replaced
  # w.created will be created
Plan: 2 to add, 1 to change, 2 to destroy.";
        let (index, reconciliation) = run(plan);
        let out = synthesize(&index, reconciliation.as_ref(), 5);
        let details: Vec<_> = out[6..].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            details,
            vec!["w.created", "x.replaced", "y.updated", "z.destroyed"]
        );
        assert_eq!(out[3].text, "* Replace Count: 1");
        assert_eq!(out[3].tone, Tone::Alert);
    }

    #[test]
    fn test_detail_lines_do_not_reclassify() {
        let (index, reconciliation) = run(VALID_PLAN);
        let out = synthesize(&index, reconciliation.as_ref(), 5);
        for set in [MarkerSet::plain(), MarkerSet::markup()] {
            for line in &out {
                let rendered = format!("{} {}{SEPARATOR}", INDENT_GLYPH, line.text);
                assert!(set.match_line(&rendered).is_none(), "{rendered}");
            }
        }
    }

    #[test]
    fn test_resource_identifier_markup() {
        let line = LogLine::new(
            3,
            r#"<span class="gl-white-space-pre-wrap term-bold">  # module.db.aws_db_instance.this[&quot;primary&quot;]</span><span class="gl-white-space-pre-wrap"> will be created</span>"#,
        );
        assert_eq!(
            resource_identifier(&line, &MarkerSet::markup()),
            r#"module.db.aws_db_instance.this["primary"]"#
        );
    }

    #[test]
    fn test_resource_identifier_without_token() {
        let line = LogLine::new(3, "aws_instance.a will be created");
        assert_eq!(resource_identifier(&line, &MarkerSet::plain()), "aws_instance.a");

        let line = LogLine::new(3, r#"<span class="term-bold">aws_instance.a</span>"#);
        assert_eq!(resource_identifier(&line, &MarkerSet::markup()), "aws_instance.a");
    }

    #[test]
    fn test_synthesize_with_explicit_declaration() {
        let mut index = ClassificationIndex::new(Dialect::Plain);
        index.push(
            OperationCategory::Replace,
            LogLine::new(2, "  # aws_instance.r must be replaced"),
        );
        let reconciliation = reconcile(&index, &DeclarationRecord::new(1, 0, 1));
        let out = synthesize(&index, Some(&reconciliation), 10);
        assert_eq!(out.len(), 7);
        assert_eq!(out[6].text, "aws_instance.r");
        assert_eq!(out[6].index, 17);
    }
}
