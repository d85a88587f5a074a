//! `regform fields` -- list the fields of an event form.

use anyhow::Result;
use regform_core::enums::ValueType;
use regform_core::field::RegistrationField;
use regform_formula::{referenced_fields, render};

use crate::cli::FieldsArgs;
use crate::context::RuntimeContext;
use crate::output::{format_value, output_json, output_table};
use regform_ui::styles::{render_muted, render_value_type};

/// Execute the `regform fields` command.
pub fn run(ctx: &RuntimeContext, args: &FieldsArgs) -> Result<()> {
    let form = ctx.load_event(&args.event)?;
    let fields: Vec<&RegistrationField> = form
        .fields
        .iter()
        .filter(|f| !args.dynamic || f.is_dynamic())
        .collect();

    if ctx.json {
        let entries: Vec<serde_json::Value> = fields
            .iter()
            .map(|f| {
                let mut entry = serde_json::to_value(f).unwrap_or(serde_json::Value::Null);
                if let (Some(formula), Some(obj)) = (f.formula.as_ref(), entry.as_object_mut()) {
                    obj.insert("expression".into(), render(formula).into());
                    obj.insert("references".into(), referenced_fields(formula).into());
                }
                entry
            })
            .collect();
        output_json(&entries);
        return Ok(());
    }

    if fields.is_empty() {
        if !ctx.quiet {
            println!("No fields.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.field_type.to_string(),
                render_value_type(&f.value_type),
                if f.required { "yes".to_string() } else { String::new() },
                describe(f),
            ]
        })
        .collect();
    output_table(&["NAME", "TYPE", "SOURCE", "REQUIRED", "DETAIL"], &rows);
    Ok(())
}

/// Short description of where a field's value comes from.
fn describe(field: &RegistrationField) -> String {
    match field.value_type {
        ValueType::Dynamic => field
            .formula
            .as_ref()
            .map(|f| format!("= {}", render(f)))
            .unwrap_or_else(|| render_muted("(no formula)")),
        ValueType::Fixed => format!("= {}", format_value(field.fixed_value.as_ref())),
        _ if !field.options.is_empty() => field
            .options
            .iter()
            .map(|o| o.field_name.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
        _ => String::new(),
    }
}
