use paramkit::error::{AppError, ErrorResponse};
use paramkit::schema::{Schema, ValueBag};
use paramkit::{check_allowed, check_params};
use tracing::debug;

use crate::cmd::{read_input, read_values, CheckArgs, CheckMode};
use crate::exit::{schema_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let schema_name = args.schema.display().to_string();
    let document = read_input(&args.schema)?;
    let document = String::from_utf8(document)
        .map_err(|err| CliError::new(DATA_INVALID, format!("{schema_name}: {err}")))?;
    let schema = Schema::from_json_str(&document).map_err(|err| schema_error(&schema_name, err))?;
    let values = read_values(&args.values)?;

    debug!(schema = %schema_name, fields = schema.len(), keys = values.len(), mode = args.mode.as_str(), "checking values");
    let outcome = check(&values, &schema, args.mode);

    let report = Report {
        target: &schema_name,
        mode: args.mode.as_str(),
        valid: outcome.is_ok(),
        status: outcome.as_ref().err().map_or(200, |err| err.status),
        error: outcome.as_ref().err().map(ErrorResponse::from),
    };
    print_report(&report, format);

    Ok(if report.valid { SUCCESS } else { DATA_INVALID })
}

fn check(values: &ValueBag, schema: &Schema, mode: CheckMode) -> Result<(), AppError> {
    match mode {
        CheckMode::Validate => check_params(values, schema),
        CheckMode::Allowed => check_allowed(values, schema),
        CheckMode::Both => check_allowed(values, schema).and_then(|()| check_params(values, schema)),
    }
}
