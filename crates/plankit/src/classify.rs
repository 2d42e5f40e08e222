//! Line classifier.
//!
//! Each line is tested, in order, against:
//! 1. the declaration pattern `<N> to add, <N> to change, <N> to destroy.`
//! 2. the operation markers of the active [`MarkerSet`]
//!
//! Lines matching neither are ignored.

use crate::error::{Error, Result};
use crate::markers::MarkerSet;
use crate::types::{
    Classification, ClassificationIndex, DeclarationPolicy, DeclarationRecord, LogLine,
};
use regex::Regex;
use std::sync::LazyLock;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<add>[0-9]+) to add, (?P<change>[0-9]+) to change, (?P<destroy>[0-9]+) to destroy\.",
    )
    .expect("declaration pattern is valid")
});

/// Parse the plan's declared totals from a line, if it is a declaration line.
///
/// Totals that do not fit in a `u32` make the line non-matching.
pub fn parse_declaration(content: &str) -> Option<DeclarationRecord> {
    let caps = DECLARATION.captures(content)?;
    let total = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();

    match (total("add"), total("change"), total("destroy")) {
        (Some(add), Some(change), Some(destroy)) => {
            Some(DeclarationRecord::new(add, change, destroy))
        }
        _ => {
            log::debug!("ignoring declaration with out-of-range totals: {content}");
            None
        }
    }
}

/// Classify every line of a log.
///
/// Returns the winning declaration (chosen per `policy` when the log holds
/// several) and the operation lines grouped by category.
pub fn classify(
    lines: &[LogLine],
    markers: &MarkerSet,
    policy: DeclarationPolicy,
) -> Result<Classification> {
    let mut declaration: Option<(u64, DeclarationRecord)> = None;
    let mut index = ClassificationIndex::new(markers.dialect());

    for line in lines {
        if let Some(record) = parse_declaration(&line.content) {
            declaration = Some(choose_declaration(declaration, (line.index, record), policy)?);
            continue;
        }

        if let Some(found) = markers.match_line(&line.content) {
            log::trace!("line {} classified as {}", line.index, found.category);
            index.push(found.category, line.clone());
        }
    }

    log::debug!(
        "classified {} of {} lines ({} dialect), declaration {}",
        index.total(),
        lines.len(),
        markers.dialect(),
        if declaration.is_some() { "found" } else { "absent" }
    );

    Ok(Classification {
        declaration: declaration.map(|(_, record)| record),
        index,
    })
}

fn choose_declaration(
    current: Option<(u64, DeclarationRecord)>,
    candidate: (u64, DeclarationRecord),
    policy: DeclarationPolicy,
) -> Result<(u64, DeclarationRecord)> {
    let Some(current) = current else {
        return Ok(candidate);
    };

    match policy {
        DeclarationPolicy::Last => {
            log::warn!(
                "plan declaration on line {} replaces the one on line {}",
                candidate.0,
                current.0
            );
            Ok(candidate)
        }
        DeclarationPolicy::First => {
            log::warn!(
                "ignoring plan declaration on line {}, keeping line {}",
                candidate.0,
                current.0
            );
            Ok(current)
        }
        DeclarationPolicy::Reject => Err(Error::DuplicateDeclaration {
            first: current.0,
            second: candidate.0,
        }),
    }
}
