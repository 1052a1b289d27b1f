use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use paramkit::schema::ValueBag;

use crate::exit::{io_error, schema_error, CliResult};
use crate::output::OutputFormat;

pub mod actions;
pub mod check;
pub mod registry;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a JSON value bag against a schema file.
    Check(CheckArgs),
    /// Check a JSON value bag against an action in a schema directory.
    Registry(RegistryArgs),
    /// List the actions and parameters in a schema directory.
    Actions(ActionsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Registry(args) => registry::run(args, format),
        Command::Actions(args) => actions::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CheckMode {
    /// Enforce required fields.
    #[default]
    Validate,
    /// Reject undeclared keys.
    Allowed,
    /// Reject undeclared keys, then enforce required fields.
    Both,
}

impl CheckMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckMode::Validate => "validate",
            CheckMode::Allowed => "allowed",
            CheckMode::Both => "both",
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON object with the parameter values (`-` reads stdin).
    pub values: PathBuf,
    /// Schema document (JSON object of field definitions).
    #[arg(long, short = 's', value_name = "FILE")]
    pub schema: PathBuf,
    /// Which check to run.
    #[arg(long, value_enum, default_value_t = CheckMode::Validate)]
    pub mode: CheckMode,
}

#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// Action whose schema applies.
    pub action: String,
    /// JSON object with the parameter values (`-` reads stdin).
    pub values: PathBuf,
    /// Directory of `<action>.schema.json` files.
    #[arg(long, value_name = "DIR", env = "PARAMKIT_SCHEMA_DIR")]
    pub dir: PathBuf,
    /// Also reject keys the schema does not declare.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Directory of `<action>.schema.json` files.
    #[arg(long, value_name = "DIR", env = "PARAMKIT_SCHEMA_DIR")]
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read a file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error(path, err))?;
        return Ok(buf);
    }
    std::fs::read(path).map_err(|err| io_error(path, err))
}

pub(crate) fn read_values(path: &Path) -> CliResult<ValueBag> {
    let payload = read_input(path)?;
    ValueBag::from_json_slice(&payload)
        .map_err(|err| schema_error(&path.display().to_string(), err))
}
