use paramkit::schema::SchemaRegistry;

use crate::cmd::ActionsArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_actions, ActionRow, OutputFormat};

pub fn run(args: ActionsArgs, format: OutputFormat) -> CliResult<i32> {
    let directory = args.dir.display().to_string();
    let registry =
        SchemaRegistry::from_directory(&args.dir).map_err(|err| schema_error(&directory, err))?;

    let rows: Vec<ActionRow<'_>> = registry
        .actions()
        .into_iter()
        .map(|action| ActionRow {
            action,
            fields: registry
                .get(action)
                .map(|schema| schema.names().collect())
                .unwrap_or_default(),
        })
        .collect();

    print_actions(&directory, &rows, format);
    Ok(SUCCESS)
}
