//! `regform eval` -- evaluate a formula file.
//!
//! Loads a formula, builds a field map from `--var` flags, and prints the
//! result (with each applied step when `--trace` is given).

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use regform_formula::{FieldMap, Formula, evaluate, evaluate_traced, parser, render};
use serde_json::Value;
use tracing::debug;

use crate::cli::EvalArgs;
use crate::context::RuntimeContext;
use crate::output::{format_number, output_json, output_table};
use regform_ui::styles::{render_computed, render_muted, render_warn};

/// Execute the `regform eval` command.
pub fn run(ctx: &RuntimeContext, args: &EvalArgs) -> Result<()> {
    let formula = read_formula(&args.formula)?;
    let fields = parse_var_flags(&args.vars)?;
    debug!(terms = formula.len(), vars = fields.len(), "evaluating formula");

    if args.trace {
        let trace = evaluate_traced(&formula, &fields);
        if ctx.json {
            output_json(&serde_json::json!({
                "formula": render(&formula),
                "result": trace.result,
                "steps": trace.steps,
            }));
            return Ok(());
        }

        println!("Formula: {}", render(&formula));
        let rows: Vec<Vec<String>> = trace
            .steps
            .iter()
            .map(|step| {
                let result = format_number(step.result);
                vec![
                    (step.index + 1).to_string(),
                    step.operator.to_string(),
                    step.source.clone(),
                    format_number(step.operand),
                    if step.skipped {
                        render_warn(&format!("{result} (skipped)"))
                    } else {
                        result
                    },
                ]
            })
            .collect();
        output_table(&["TERM", "OP", "OPERAND", "VALUE", "RESULT"], &rows);
        println!("Result: {}", render_computed(&format_number(trace.result)));
        return Ok(());
    }

    let result = evaluate(&formula, &fields);
    if ctx.json {
        output_json(&serde_json::json!({
            "formula": render(&formula),
            "result": result,
        }));
    } else if ctx.quiet {
        println!("{}", format_number(result));
    } else {
        println!(
            "{} {}",
            format_number(result),
            render_muted(&format!("= {}", render(&formula)))
        );
    }
    Ok(())
}

/// Load a formula from a file, or from stdin when `source` is `-`.
fn read_formula(source: &str) -> Result<Formula> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read formula from stdin")?;
        return parser::parse_any(&content).context("invalid formula on stdin");
    }
    let path = Path::new(source);
    parser::load_formula(path).with_context(|| format!("failed to load formula {}", path.display()))
}

/// Parse `--var key=value` flags into a field map.
///
/// Values that parse as JSON keep their JSON type (`3`, `true`, `"x"`);
/// anything else is taken as text.
pub(crate) fn parse_var_flags(vars: &[String]) -> Result<FieldMap> {
    let mut map = FieldMap::new();
    for v in vars {
        let Some((key, raw)) = v.split_once('=') else {
            bail!("invalid variable format '{}': expected key=value", v);
        };
        if key.is_empty() {
            bail!("invalid variable format '{}': empty key", v);
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}
