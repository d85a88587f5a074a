//! `regform config` -- manage configuration (set/get/list/unset).
//!
//! Values live in `.regform/config.yaml`. `set` and `unset` create the
//! directory in the working directory when none was found.

use anyhow::{Context, Result};
use regform_config::config::{KEYS, save_config};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `regform config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Set(set_args) => {
            let dir = ctx.regform_dir_for_write()?;
            let mut config = ctx.config.clone();
            config.set_key(&set_args.key, &set_args.value)?;
            save_config(&dir, &config)
                .with_context(|| format!("failed to write configuration to {}", dir.display()))?;

            let value = config.get_key(&set_args.key)?;
            if ctx.json {
                output_json(&serde_json::json!({
                    "key": set_args.key,
                    "value": value,
                }));
            } else if !ctx.quiet {
                println!("Set {} = {}", set_args.key, value);
            }
        }

        ConfigCommands::Get(get_args) => {
            let value = ctx.config.get_key(&get_args.key)?;
            if ctx.json {
                output_json(&serde_json::json!({
                    "key": get_args.key,
                    "value": value,
                }));
            } else {
                println!("{}", value);
            }
        }

        ConfigCommands::List => {
            let mut entries = Vec::with_capacity(KEYS.len());
            for key in KEYS {
                entries.push((*key, ctx.config.get_key(key)?));
            }

            if ctx.json {
                let map: serde_json::Map<String, serde_json::Value> = entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                output_json(&map);
            } else {
                for (key, value) in &entries {
                    println!("{} = {}", key, value);
                }
            }
        }

        ConfigCommands::Unset(unset_args) => {
            let dir = ctx.regform_dir_for_write()?;
            let mut config = ctx.config.clone();
            config.unset_key(&unset_args.key)?;
            save_config(&dir, &config)
                .with_context(|| format!("failed to write configuration to {}", dir.display()))?;

            let value = config.get_key(&unset_args.key)?;
            if ctx.json {
                output_json(&serde_json::json!({
                    "key": unset_args.key,
                    "value": value,
                }));
            } else if !ctx.quiet {
                println!("Unset {} (now {})", unset_args.key, value);
            }
        }
    }

    Ok(())
}
