use paramkit::error::ErrorResponse;
use paramkit::schema::{RegistryConfig, SchemaRegistry};
use paramkit::schema_error as app_error;

use crate::cmd::{read_values, RegistryArgs};
use crate::exit::{schema_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

pub fn run(args: RegistryArgs, format: OutputFormat) -> CliResult<i32> {
    let config = RegistryConfig {
        strict_mode: args.strict,
        fail_on_missing_schema: true,
        ..RegistryConfig::default()
    };
    let registry = SchemaRegistry::from_directory_with_config(&args.dir, config)
        .map_err(|err| schema_error(&args.dir.display().to_string(), err))?;
    let values = read_values(&args.values)?;

    let error = match registry.validate(&args.action, &values) {
        Ok(()) => None,
        Err(err) if err.validation().is_some() => Some(app_error(&err)),
        Err(err) => return Err(schema_error(&args.action, err)),
    };

    let report = Report {
        target: &args.action,
        mode: if args.strict { "both" } else { "validate" },
        valid: error.is_none(),
        status: error.as_ref().map_or(200, |err| err.status),
        error: error.as_ref().map(ErrorResponse::from),
    };
    print_report(&report, format);

    Ok(if report.valid { SUCCESS } else { DATA_INVALID })
}
