//! Operation markers for each supported log dialect.
//!
//! A marker is a literal fragment that appears on exactly one kind of
//! resource line in a Terraform plan, e.g. `# aws_instance.web will be created`.
//! Markers are tested in a fixed priority order and the first hit wins, so a
//! line is never placed in more than one category.

use crate::types::{Dialect, LogLine, OperationCategory};

/// Markers as rendered by the GitLab job log.
///
/// The destructive verbs are split into a separate bold red span, which keeps
/// them distinct from the plain `created` and `updated` spans.
const MARKUP_MARKERS: [(OperationCategory, &str); 4] = [
    (
        OperationCategory::Destroy,
        r#"<span class="gl-white-space-pre-wrap"> will be </span><span class="gl-white-space-pre-wrap term-fg-l-red term-bold">destroyed</span>"#,
    ),
    (
        OperationCategory::Replace,
        r#"<span class="gl-white-space-pre-wrap"> must be </span><span class="gl-white-space-pre-wrap term-fg-l-red term-bold">replaced</span>"#,
    ),
    (
        OperationCategory::Create,
        r#"<span class="gl-white-space-pre-wrap"> will be created</span>"#,
    ),
    (
        OperationCategory::Update,
        r#"<span class="gl-white-space-pre-wrap"> will be updated in-place</span>"#,
    ),
];

/// Markers as printed to a terminal with colors stripped.
const PLAIN_MARKERS: [(OperationCategory, &str); 4] = [
    (OperationCategory::Destroy, " will be destroyed"),
    (OperationCategory::Replace, " must be replaced"),
    (OperationCategory::Create, " will be created"),
    (OperationCategory::Update, " will be updated in-place"),
];

/// A match of a marker on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Category the marker stands for
    pub category: OperationCategory,
    /// Byte offset where the marker starts
    pub offset: usize,
}

/// The ordered markers of one dialect.
#[derive(Debug, Clone, Copy)]
pub struct MarkerSet {
    dialect: Dialect,
    markers: &'static [(OperationCategory, &'static str); 4],
}

impl MarkerSet {
    /// Markers for rendered job log markup.
    pub fn markup() -> Self {
        Self {
            dialect: Dialect::Markup,
            markers: &MARKUP_MARKERS,
        }
    }

    /// Markers for plain terminal output.
    pub fn plain() -> Self {
        Self {
            dialect: Dialect::Plain,
            markers: &PLAIN_MARKERS,
        }
    }

    /// Markers for a dialect, resolving `Auto` against the given lines.
    pub fn for_lines(dialect: Dialect, lines: &[LogLine]) -> Self {
        match dialect.resolve(lines) {
            Dialect::Markup => Self::markup(),
            _ => Self::plain(),
        }
    }

    /// Markers for an already resolved dialect. `Auto` falls back to plain.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Markup => Self::markup(),
            Dialect::Plain | Dialect::Auto => Self::plain(),
        }
    }

    /// The dialect these markers belong to.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Find the first marker, in priority order, contained in `content`.
    pub fn match_line(&self, content: &str) -> Option<MarkerMatch> {
        self.markers.iter().find_map(|(category, marker)| {
            content.find(marker).map(|offset| MarkerMatch {
                category: *category,
                offset,
            })
        })
    }

    /// Iterate over the markers in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (OperationCategory, &'static str)> {
        self.markers.iter().copied()
    }
}
