use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::parser::InterchangeParser;
use crate::schema::TransactionSchema;
use crate::{read_input, run_query, QueryOptions};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Query {
            epath,
            schema_file,
            format,
            file,
        }) => _query(epath, schema_file.as_deref(), *format, file),
        Some(Commands::Tree { schema_file, file }) => _tree(schema_file.as_deref(), file),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "missing command; see 'ediq --help'".to_string(),
        )),
    }
}

#[instrument]
fn _query(epath: &str, schema_file: Option<&Path>, format: bool, file: &str) -> CliResult<()> {
    debug!("epath: {:?}, file: {:?}", epath, file);
    let input = read_input(file)?;
    let schema = schema_file.map(TransactionSchema::load).transpose()?;
    let options = QueryOptions {
        epath,
        schema: schema.as_ref(),
        format,
    };
    let stdout = io::stdout();
    run_query(&input, &options, &mut stdout.lock())?;
    Ok(())
}

#[instrument]
fn _tree(schema_file: Option<&Path>, file: &str) -> CliResult<()> {
    debug!("file: {:?}", file);
    let input = read_input(file)?;
    let schema = schema_file.map(TransactionSchema::load).transpose()?;
    let parser = match schema.as_ref() {
        Some(schema) => InterchangeParser::with_schema(schema),
        None => InterchangeParser::new(),
    };
    let interchange = parser.parse(&input)?;
    println!("{}", interchange.root.to_display_tree());
    Ok(())
}

fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
