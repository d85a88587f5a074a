//! `regform fill` -- fill an event form from the terminal.
//!
//! Prompts for each user-editable field in form order and re-prints the
//! dynamic fields after every accepted value. An empty answer skips the
//! field; end of input finishes early. Prompts go to stderr so stdout can
//! be piped.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use regform_config::config::RegformConfig;
use regform_core::enums::FieldType;
use regform_core::field::RegistrationField;
use regform_core::form::FormState;
use serde_json::Value;

use crate::cli::FillArgs;
use crate::commands::compute::print_state;
use crate::context::RuntimeContext;
use crate::output::output_json;
use regform_ui::styles::{render_computed, render_muted, render_warn};
use regform_ui::terminal::stdin_is_tty;

/// Execute the `regform fill` command.
pub fn run(ctx: &RuntimeContext, args: &FillArgs) -> Result<()> {
    let form = ctx.load_event(&args.event)?;
    let mut state = FormState::new(&form);

    if stdin_is_tty() && !ctx.quiet {
        eprintln!(
            "{}",
            render_muted(&format!(
                "Filling '{}'. Press Enter to skip a field, Ctrl+D to finish.",
                form.display_title()
            ))
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'fields: for field in form.fields.iter().filter(|f| f.value_type.is_editable()) {
        let prompts = prompts_for(field);
        for (key, prompt) in prompts {
            eprint!("{prompt}: ");
            io::stderr().flush().ok();

            let Some(line) = lines.next() else {
                eprintln!();
                break 'fields;
            };
            let answer = line?;
            let answer = answer.trim();
            if answer.is_empty() {
                continue;
            }

            match parse_answer(field, answer) {
                Ok(value) => {
                    state.set(&key, value)?;
                    if !ctx.json && !ctx.quiet {
                        println!("{}", summarize(&ctx.config, &state));
                    }
                }
                Err(reason) => eprintln!("{}", render_warn(&format!("skipped {key}: {reason}"))),
            }
        }
    }

    if ctx.json {
        let dynamic: serde_json::Map<String, Value> = state
            .dynamic_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::from(value)))
            .collect();
        output_json(&serde_json::json!({
            "event": form.event,
            "values": state.values(),
            "dynamic": dynamic,
            "missing_required": state.missing_required(),
        }));
    } else {
        println!();
        print_state(ctx, &form, &state);
    }
    Ok(())
}

/// Field-map keys to ask for and their prompt text.
fn prompts_for(field: &RegistrationField) -> Vec<(String, String)> {
    let required = if field.required { " *" } else { "" };
    match field.field_type {
        FieldType::CheckBoxGroup => field
            .options
            .iter()
            .map(|o| {
                let label = if o.label_name.is_empty() {
                    &o.field_name
                } else {
                    &o.label_name
                };
                (
                    o.field_name.clone(),
                    format!("{} / {} [y/N]", field.label(), label),
                )
            })
            .collect(),
        FieldType::Boolean => vec![(
            field.name.clone(),
            format!("{}{} [y/N]", field.label(), required),
        )],
        FieldType::Option | FieldType::RadioButtonGroup => {
            let choices: Vec<&str> = field.options.iter().map(|o| o.field_name.as_str()).collect();
            vec![(
                field.name.clone(),
                format!("{}{} ({})", field.label(), required, choices.join("/")),
            )]
        }
        _ => vec![(field.name.clone(), format!("{}{}", field.label(), required))],
    }
}

/// Convert an answer to the value stored for `field`.
fn parse_answer(field: &RegistrationField, answer: &str) -> Result<Value, String> {
    match &field.field_type {
        FieldType::Number => answer
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::from)
            .ok_or_else(|| format!("'{answer}' is not a number")),
        FieldType::Boolean | FieldType::CheckBoxGroup => parse_yes_no(answer)
            .map(Value::Bool)
            .ok_or_else(|| format!("'{answer}' is not yes or no")),
        FieldType::Option | FieldType::RadioButtonGroup => field
            .options
            .iter()
            .find(|o| {
                o.field_name.eq_ignore_ascii_case(answer) || o.label_name.eq_ignore_ascii_case(answer)
            })
            .map(|o| Value::String(o.field_name.clone()))
            .ok_or_else(|| format!("'{answer}' is not one of the options")),
        _ => Ok(Value::String(answer.to_string())),
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// One line with every dynamic field, e.g. `  subtotal = $80.00`.
fn summarize(config: &RegformConfig, state: &FormState<'_>) -> String {
    let parts: Vec<String> = state
        .dynamic_values()
        .into_iter()
        .map(|(name, value)| format!("{} = {}", name, render_computed(&config.format_amount(value))))
        .collect();
    format!("  {}", parts.join(", "))
}
