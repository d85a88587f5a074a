//! `regform version` -- print version, build and platform.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::context::RuntimeContext;
use crate::output::output_json;

/// What `regform version` reports.
#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    /// `REGFORM_BUILD` at compile time, `dev` otherwise.
    build: &'static str,
    os: &'static str,
    arch: &'static str,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build: option_env!("REGFORM_BUILD").unwrap_or("dev"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "regform {} ({}, {}/{})",
            self.version, self.build, self.os, self.arch
        )
    }
}

/// Execute the `regform version` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let info = VersionInfo::current();
    if ctx.json {
        output_json(&info);
    } else {
        println!("{info}");
    }
    Ok(())
}
