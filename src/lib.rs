use std::fs;
use std::io::{self, Read, Write};

use tracing::{debug, instrument};

pub mod cli;
pub mod epath;
pub mod errors;
pub mod exitcode;
pub mod model;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod util;

use crate::epath::Epath;
use crate::errors::EdiResult;
use crate::parser::InterchangeParser;
use crate::schema::TransactionSchema;
use crate::serializer::serialize;

/// Everything one query invocation needs besides the input text.
#[derive(Debug)]
pub struct QueryOptions<'a> {
    /// Selection expression, e.g. `//AK2`
    pub epath: &'a str,
    /// Optional loop schema applied while building the tree
    pub schema: Option<&'a TransactionSchema>,
    /// Line-formatted loop output, one segment per line
    pub format: bool,
}

/// Read the EDI input; `-` selects standard input.
pub fn read_input(file: &str) -> EdiResult<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

/// Parse the input, evaluate the selection, and write one reconstructed
/// record per matched node to `out`, in document order, each followed by a
/// line terminator. Zero matches produce zero records.
///
/// Records already written stay written when a later step fails;
/// completeness is best-effort at this boundary.
#[instrument(level = "debug", skip_all, fields(epath = options.epath))]
pub fn run_query(input: &str, options: &QueryOptions, out: &mut impl Write) -> EdiResult<()> {
    let epath = Epath::parse(options.epath)?;
    let parser = match options.schema {
        Some(schema) => InterchangeParser::with_schema(schema),
        None => InterchangeParser::new(),
    };
    let interchange = parser.parse(input)?;

    let matches = epath.select(&interchange.root);
    debug!(matches = matches.len(), "selection evaluated");

    for node in matches {
        writeln!(out, "{}", serialize(node, &interchange.delimiters, options.format))?;
    }
    Ok(())
}
