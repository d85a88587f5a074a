//! Command handlers, one module per subcommand.

pub mod completion;
pub mod compute;
pub mod config_cmd;
pub mod eval;
pub mod fields;
pub mod fill;
pub mod lint;
pub mod version;
