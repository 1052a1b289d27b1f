mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{effective_level, init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "paramkit", version, about = "Request-parameter schema checker")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Suppress all log output.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { exit::USAGE } else { exit::SUCCESS };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_logging(cli.log_format, effective_level(cli.log_level, cli.quiet));

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::CheckMode;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "paramkit",
            "check",
            "values.json",
            "--schema",
            "signup.json",
            "--mode",
            "both",
        ])
        .expect("check args should parse");

        match cli.command {
            Command::Check(args) => assert_eq!(args.mode, CheckMode::Both),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn check_requires_schema() {
        let err = Cli::try_parse_from(["paramkit", "check", "values.json"])
            .expect_err("missing --schema should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_registry_subcommand() {
        let cli = Cli::try_parse_from([
            "paramkit",
            "--format",
            "json",
            "registry",
            "signup",
            "-",
            "--dir",
            "/etc/paramkit",
            "--strict",
        ])
        .expect("registry args should parse");

        match cli.command {
            Command::Registry(args) => {
                assert_eq!(args.action, "signup");
                assert!(args.strict);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
