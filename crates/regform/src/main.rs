//! `regform` -- compute registration forms from their field formulas.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C exits cleanly, a second one forces exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("regform=debug,regform_core=debug,regform_formula=trace")
            .with_writer(std::io::stderr)
            .init();
    }

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| dispatch(&ctx, &cli));

    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn dispatch(ctx: &RuntimeContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Eval(args)) => commands::eval::run(ctx, args),
        Some(Commands::Compute(args)) => commands::compute::run(ctx, args),
        Some(Commands::Fields(args)) => commands::fields::run(ctx, args),
        Some(Commands::Lint(args)) => commands::lint::run(ctx, args),
        Some(Commands::Fill(args)) => commands::fill::run(ctx, args),
        Some(Commands::Config(args)) => commands::config_cmd::run(ctx, args),
        Some(Commands::Completion(args)) => commands::completion::run(args),
        Some(Commands::Version) => commands::version::run(ctx),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}
