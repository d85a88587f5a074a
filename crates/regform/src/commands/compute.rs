//! `regform compute` -- compute an event form from given values.
//!
//! Applies each `--var` to a fresh form state (dynamic fields are
//! recomputed after every value, exactly as they are while a registrant
//! types) and prints every field with its final value.

use anyhow::{Context, Result};
use regform_core::enums::{FieldType, ValueType};
use regform_core::event::EventForm;
use regform_core::form::FormState;
use tracing::debug;

use crate::cli::ComputeArgs;
use crate::commands::eval::parse_var_flags;
use crate::context::RuntimeContext;
use crate::output::{format_value, output_json, output_table};
use regform_ui::styles::{render_computed, render_value_type};

/// Execute the `regform compute` command.
pub fn run(ctx: &RuntimeContext, args: &ComputeArgs) -> Result<()> {
    let form = ctx.load_event(&args.event)?;
    let vars = parse_var_flags(&args.vars)?;

    let mut state = FormState::new(&form);
    // Apply in a stable order so repeated runs log identically.
    let mut names: Vec<&String> = vars.keys().collect();
    names.sort();
    for name in names {
        debug!(field = %name, "applying value");
        state
            .set(name, vars[name].clone())
            .with_context(|| format!("cannot set '{}'", name))?;
    }

    if args.submit {
        let submission = state.submission()?;
        output_json(&serde_json::json!({
            "event": form.event,
            "values": submission,
        }));
        return Ok(());
    }

    if ctx.json {
        let dynamic: serde_json::Map<String, serde_json::Value> = state
            .dynamic_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
            .collect();
        output_json(&serde_json::json!({
            "event": form.event,
            "values": state.values(),
            "dynamic": dynamic,
            "missing_required": state.missing_required(),
        }));
        return Ok(());
    }

    print_state(ctx, &form, &state);
    Ok(())
}

/// Print each field with its current value, dynamic results highlighted.
pub(crate) fn print_state(ctx: &RuntimeContext, form: &EventForm, state: &FormState<'_>) {
    if !ctx.quiet {
        println!("{}", form.display_title());
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for field in &form.fields {
        if field.field_type == FieldType::CheckBoxGroup {
            for option in &field.options {
                rows.push(vec![
                    format!("{}.{}", field.name, option.field_name),
                    option.label_name.clone(),
                    render_value_type(&field.value_type),
                    format_value(state.get(&option.field_name)),
                ]);
            }
            continue;
        }

        let value = if field.value_type == ValueType::Dynamic {
            let amount = state
                .get(&field.name)
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0);
            render_computed(&ctx.config.format_amount(amount))
        } else {
            format_value(state.get(&field.name))
        };
        rows.push(vec![
            field.name.clone(),
            field.label().to_string(),
            render_value_type(&field.value_type),
            value,
        ]);
    }
    output_table(&["FIELD", "LABEL", "SOURCE", "VALUE"], &rows);

    let missing = state.missing_required();
    if !missing.is_empty() && !ctx.quiet {
        println!();
        println!("Missing required: {}", missing.join(", "));
    }
}
