//! `annotate` - print a job log followed by its synthesized summary

use anyhow::{Context as AnyhowContext, Result};
use plankit::{Engine, LogView};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::Context;
use crate::cli::AnnotateArgs;
use crate::config::PlansumConfig;
use crate::ui;
use crate::view::{FileLog, FileReady};

pub fn run(ctx: &Context, args: AnnotateArgs) -> Result<()> {
    let config = effective_config(&ctx.config, &args);
    let engine = Engine::new(config.engine_options());
    let mut log = FileLog::new(&args.log);

    let readiness = config.readiness_config();
    let outcome = if args.no_wait {
        engine.run(&mut log).map(Some)
    } else {
        let probe = FileReady::new(&args.log, config.readiness.ready_marker.clone());
        engine.run_when_ready(&mut log, &probe, &readiness)
    };

    match outcome {
        Ok(Some(analysis)) => {
            if analysis.has_declaration() && !analysis.is_validated() {
                log::warn!("summary of {} failed validation", args.log.display());
            }
        }
        Ok(None) => {
            if !ctx.quiet {
                ui::warn(&format!(
                    "{} not ready after {}ms, printing it without a summary",
                    args.log.display(),
                    readiness.budget().as_millis()
                ));
            }
            // The log is echoed as it stands, if there is one
            if let Err(e) = log.read() {
                log::warn!("nothing to annotate: {e}");
                return Ok(());
            }
        }
        Err(plankit::Error::View { message }) => anyhow::bail!(message),
        // The log is still printed, just without a summary
        Err(e) => log::warn!("not summarizing {}: {e}", args.log.display()),
    }

    let markup_input = log.is_markup();
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            log.write_to(&mut out, args.format, markup_input)
                .with_context(|| format!("Could not write {}", path.display()))?;
            if !ctx.quiet {
                ui::success(&format!("Annotated log written to {}", path.display()));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            log.write_to(&mut out, args.format, markup_input)?;
            out.flush()?;
        }
    }

    Ok(())
}

/// Layer command-line flags over the loaded config
fn effective_config(base: &PlansumConfig, args: &AnnotateArgs) -> PlansumConfig {
    let mut config = base.clone();
    config.apply_classify_args(&args.classify);
    if let Some(interval_ms) = args.interval_ms {
        config.readiness.interval_ms = interval_ms;
    }
    if let Some(max_retry) = args.max_retry {
        config.readiness.max_retry = max_retry;
    }
    if args.ready_marker.is_some() {
        config.readiness.ready_marker = args.ready_marker.clone();
    }
    config
}
