//! `regform lint` -- check an event form for configuration problems.
//!
//! Errors are structural (a dynamic field without a formula, duplicate
//! names, missing options). Warnings point at formulas that evaluate but
//! likely not as intended (unknown references, unknown operators, literal
//! division by zero). Exits non-zero on errors, or on warnings in strict
//! mode.

use anyhow::{Result, bail};
use regform_core::validation::{Severity, has_errors, lint};

use crate::cli::LintArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;
use regform_ui::styles::{render_diagnostic, render_pass_icon};

/// Execute the `regform lint` command.
pub fn run(ctx: &RuntimeContext, args: &LintArgs) -> Result<()> {
    let form = ctx.load_event(&args.event)?;
    let diagnostics = lint(&form);
    let strict = args.strict || ctx.config.lint.strict;

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if ctx.json {
        output_json(&serde_json::json!({
            "event": form.event,
            "errors": errors,
            "warnings": warnings,
            "diagnostics": diagnostics,
        }));
    } else if diagnostics.is_empty() {
        if !ctx.quiet {
            println!("{} {}: no problems found", render_pass_icon(), form.event);
        }
    } else {
        for diag in &diagnostics {
            if ctx.quiet && diag.severity == Severity::Warning && !strict {
                continue;
            }
            println!("{}", render_diagnostic(diag));
        }
        if !ctx.quiet {
            println!();
            println!("{}: {} error(s), {} warning(s)", form.event, errors, warnings);
        }
    }

    if has_errors(&diagnostics) {
        bail!("{} has {} error(s)", form.event, errors);
    }
    if strict && warnings > 0 {
        bail!("{} has {} warning(s) (strict mode)", form.event, warnings);
    }
    Ok(())
}
