//! # plankit
//!
//! Summarize Terraform plan job logs.
//!
//! This crate provides functionality for:
//! - Classifying plan log lines into create / replace / update / destroy
//! - Reading the plan's declared totals (`N to add, N to change, N to destroy.`)
//! - Cross-checking classified lines against the declared totals
//! - Synthesizing numbered summary lines to append after the log
//!
//! ## Example
//!
//! ```
//! use plankit::{Engine, MemoryLog};
//!
//! let mut log = MemoryLog::from_text(
//!     "  # aws_instance.web will be created\n\
//!      Plan: 1 to add, 0 to change, 0 to destroy.",
//! );
//!
//! let analysis = Engine::default().run(&mut log).expect("summarize");
//! assert!(analysis.is_validated());
//! // spacer, header, four count lines, one resource line
//! assert_eq!(log.appended().len(), 7);
//! ```
//!
//! ## Drift Detection
//!
//! Classification is a heuristic over rendered text. When the classified
//! counts disagree with the declaration, the summary is replaced by a single
//! alert line instead of a possibly misleading listing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod error;
pub mod markers;
pub mod markup;
pub mod readiness;
pub mod reconcile;
pub mod render;
pub mod synthesize;
pub mod types;
pub mod view;

pub use error::{Error, Result};
pub use markers::MarkerSet;
pub use readiness::{ReadinessProbe, WaitCallback};
pub use types::{
    Bucket, Buckets, CategoryCounts, Classification, ClassificationIndex, DeclarationPolicy,
    DeclarationRecord, Dialect, Indent, LogLine, OperationCategory, ReadinessConfig,
    ReconciliationResult, Summary, SynthesizedLine, Tone,
};
pub use view::{LogView, MemoryLog};

/// Result of running the pipeline over one snapshot of a log.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Declaration and classified lines
    pub classification: Classification,
    /// Count check, present only when the log declared totals
    pub reconciliation: Option<ReconciliationResult>,
    /// Lines to append after the log
    pub lines: Vec<SynthesizedLine>,
}

impl Analysis {
    /// Whether the log declared totals at all.
    pub fn has_declaration(&self) -> bool {
        self.classification.declaration.is_some()
    }

    /// Whether the classified lines agree with the declaration.
    pub fn is_validated(&self) -> bool {
        self.reconciliation
            .as_ref()
            .is_some_and(ReconciliationResult::is_validated)
    }

    /// Serializable report, or `None` when the log declared nothing.
    pub fn summary(&self) -> Option<Summary> {
        let declaration = self.classification.declaration?;
        let reconciliation = self.reconciliation.clone()?;
        let index = &self.classification.index;
        let markers = MarkerSet::for_dialect(index.dialect());

        let resources = index
            .iter()
            .map(|(category, lines)| {
                let names = lines
                    .iter()
                    .map(|l| synthesize::resource_identifier(l, &markers))
                    .collect();
                (category, names)
            })
            .collect();

        Some(Summary {
            declaration,
            reconciliation,
            resources,
        })
    }
}

/// Settings for one engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Marker set to classify with
    pub dialect: Dialect,
    /// Handling of repeated declaration lines
    pub declaration_policy: DeclarationPolicy,
}

/// Runs classification, reconciliation and synthesis against a log.
///
/// The engine holds no state between runs; every call works on a fresh
/// snapshot of the log.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    /// Create an engine with custom options.
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Analyze a snapshot of log lines without touching any log.
    pub fn analyze(&self, lines: &[LogLine]) -> Result<Analysis> {
        let markers = MarkerSet::for_lines(self.options.dialect, lines);
        let classification =
            classify::classify(lines, &markers, self.options.declaration_policy)?;

        let reconciliation = classification
            .declaration
            .as_ref()
            .map(|d| reconcile::reconcile(&classification.index, d));

        let last_index = lines.last().map_or(0, |l| l.index);
        let lines = synthesize::synthesize(
            &classification.index,
            reconciliation.as_ref(),
            last_index,
        );

        Ok(Analysis {
            classification,
            reconciliation,
            lines,
        })
    }

    /// Read the log, analyze it and append the synthesized lines.
    ///
    /// Nothing is appended when the log holds no declaration.
    pub fn run(&self, view: &mut dyn LogView) -> Result<Analysis> {
        let lines = view.read()?;
        let analysis = self.analyze(&lines)?;

        if analysis.lines.is_empty() {
            log::info!("no plan declaration found, nothing to summarize");
        } else {
            view.append(&analysis.lines)?;
            log::info!("appended {} summary lines", analysis.lines.len());
        }

        Ok(analysis)
    }

    /// Wait for the log to become ready, then [`run`](Self::run).
    ///
    /// Returns `Ok(None)` when the readiness budget is exhausted; the log is
    /// left untouched in that case.
    pub fn run_when_ready(
        &self,
        view: &mut dyn LogView,
        probe: &dyn ReadinessProbe,
        config: &ReadinessConfig,
    ) -> Result<Option<Analysis>> {
        match readiness::wait_until_ready(config, probe, Some(&readiness::LogCallback)) {
            Ok(attempts) => log::debug!("log ready after {attempts} attempt(s)"),
            Err(e) if e.is_quiet() => {
                log::warn!("giving up on summary: {e}");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        self.run(view).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const PLAN: &str = "\
Terraform will perform the following actions:
  # aws_instance.a will be created
  # aws_instance.b will be created
  # aws_instance.c will be updated in-place
  # aws_instance.d will be destroyed
Plan: 2 to add, 1 to change, 1 to destroy.";

    #[test]
    fn test_run_appends_summary() {
        let mut log = MemoryLog::from_text(PLAN);
        let analysis = Engine::default().run(&mut log).unwrap();

        assert!(analysis.is_validated());
        assert_eq!(log.appended().len(), 2 + 4 + 4);
        assert_eq!(log.appended()[0].index, 7);
        assert_eq!(log.read().unwrap().len(), 6);
    }

    #[test]
    fn test_run_without_declaration_is_noop() {
        let mut log = MemoryLog::from_text("  # aws_instance.a will be created");
        let analysis = Engine::default().run(&mut log).unwrap();

        assert!(!analysis.has_declaration());
        assert!(analysis.summary().is_none());
        assert!(log.appended().is_empty());
    }

    #[test]
    fn test_run_on_empty_log() {
        let mut log = MemoryLog::default();
        let analysis = Engine::default().run(&mut log).unwrap();
        assert!(analysis.lines.is_empty());
    }

    #[test]
    fn test_mismatch_appends_three_lines() {
        let plan = PLAN.replace("  # aws_instance.b will be created\n", "");
        let mut log = MemoryLog::from_text(&plan);
        let analysis = Engine::default().run(&mut log).unwrap();

        assert!(analysis.has_declaration());
        assert!(!analysis.is_validated());
        assert_eq!(log.appended().len(), 3);
    }

    #[test]
    fn test_numbering_follows_last_line_index() {
        let lines = vec![
            LogLine::new(100, "  # aws_instance.a will be created"),
            LogLine::new(140, "Plan: 1 to add, 0 to change, 0 to destroy."),
        ];
        let analysis = Engine::default().analyze(&lines).unwrap();
        let indices: Vec<_> = analysis.lines.iter().map(|l| l.index).collect();
        assert_eq!(indices, (141..=147).collect::<Vec<_>>());
    }

    #[test]
    fn test_summary_lists_resources() {
        let analysis = Engine::default()
            .run(&mut MemoryLog::from_text(PLAN))
            .unwrap();
        let summary = analysis.summary().unwrap();

        assert_eq!(summary.declaration, DeclarationRecord::new(2, 1, 1));
        assert_eq!(
            summary.resources[&OperationCategory::Create],
            vec!["aws_instance.a", "aws_instance.b"]
        );
        assert!(summary.resources[&OperationCategory::Replace].is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["reconciliation"]["status"], "validated");
        assert_eq!(json["resources"]["destroy"][0], "aws_instance.d");
    }

    #[test]
    fn test_reject_policy_fails_run() {
        let plan = format!("{PLAN}\nPlan: 9 to add, 0 to change, 0 to destroy.");
        let engine = Engine::new(EngineOptions {
            declaration_policy: DeclarationPolicy::Reject,
            ..Default::default()
        });
        let mut log = MemoryLog::from_text(&plan);

        let err = engine.run(&mut log).unwrap_err();
        assert!(matches!(err, Error::DuplicateDeclaration { .. }));
        assert!(log.appended().is_empty());
    }

    #[test]
    fn test_run_when_ready_gives_up_quietly() {
        let mut log = MemoryLog::from_text(PLAN);
        let config = ReadinessConfig::new(Duration::from_millis(1), 2);

        let outcome = Engine::default()
            .run_when_ready(&mut log, &|| false, &config)
            .unwrap();

        assert!(outcome.is_none());
        assert!(log.appended().is_empty());
    }

    #[test]
    fn test_run_when_ready_runs() {
        let mut log = MemoryLog::from_text(PLAN);
        let config = ReadinessConfig::new(Duration::from_millis(1), 2);

        let outcome = Engine::default()
            .run_when_ready(&mut log, &|| true, &config)
            .unwrap();

        assert!(outcome.unwrap().is_validated());
        assert_eq!(log.appended().len(), 10);
    }
}
