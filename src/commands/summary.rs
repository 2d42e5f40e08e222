//! `summary` - show what a plan will do without printing the log

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use plankit::{Analysis, Engine, LogView, OperationCategory, ReconciliationResult, Summary};

use crate::Context;
use crate::cli::SummaryArgs;
use crate::ui;
use crate::view::FileLog;

pub fn run(ctx: &Context, args: SummaryArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    config.apply_classify_args(&args.classify);

    let mut log = FileLog::new(&args.log);
    let lines = log
        .read()
        .with_context(|| format!("Could not load {}", args.log.display()))?;

    let analysis = match Engine::new(config.engine_options()).analyze(&lines) {
        Ok(analysis) => analysis,
        Err(e) => {
            ui::warn(&format!("Not summarizing {}: {e}", args.log.display()));
            return Ok(());
        }
    };

    let summary = analysis.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    match summary {
        Some(summary) => show(ctx, &analysis, &summary),
        None => ui::info(&format!(
            "No plan declaration found in {}",
            args.log.display()
        )),
    }

    Ok(())
}

fn show(ctx: &Context, analysis: &Analysis, summary: &Summary) {
    let declared = summary.declaration;
    ui::header("Plan Summary");
    ui::kv(
        "Declared",
        &format!(
            "{} to add, {} to change, {} to destroy",
            declared.to_add, declared.to_change, declared.to_destroy
        ),
    );

    match &summary.reconciliation {
        ReconciliationResult::Validated { .. } => {
            ui::success("Resource lines match the declared totals");
        }
        ReconciliationResult::Mismatch {
            bucket,
            expected,
            actual,
        } => {
            ui::warn(&format!(
                "Counts do not match: plan declares {} to {bucket}, found {} resource lines",
                expected.get(*bucket),
                actual.get(*bucket)
            ));
            ui::dim("The log format may have changed; no resource listing is shown.");
            return;
        }
    }

    for category in OperationCategory::ALL {
        let names = summary
            .resources
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default();
        ui::section(&format!("{category} ({})", names.len()));

        if names.is_empty() {
            ui::dim("none");
            continue;
        }

        let lines = analysis.classification.index.lines(category);
        for (name, line) in names.iter().zip(lines) {
            let glyph = ui::paint("│", category.indent_tone());
            if ctx.verbose > 0 {
                println!("  {glyph} {name}  {}", format!("L{}", line.index).as_str().dimmed());
            } else {
                println!("  {glyph} {name}");
            }
        }
    }
}
