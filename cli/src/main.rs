//! okay: validate JSON Lines files against a TOML schema.
//!
//! Every finding is printed to stdout as one JSON message per line, tagged
//! with the `store` and `document_number` it came from. Documents can be
//! routed to an accepted and a rejected file along the way.
//!
//! Usage:
//!   okay validate --schema hotel.toml feeds/
//!   okay validate --schema hotel.toml feed.jsonl --accepted ok.jsonl --rejected bad.jsonl
//!   cat feed.jsonl | okay validate --schema hotel.toml -
//!   okay check --schema hotel.toml
//!
//! Exit status is 0 when nothing was reported, 1 when any message was
//! printed, and 2 when the schema or the input could not be used.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use okay_config::{CustomValidators, SchemaFile};
use okay_contracts::error::{OkayError, OkayResult};
use okay_contracts::message::{kinds, Message, MessageContext};
use okay_contracts::value::describe;
use okay_core::{validate, Schema};
use okay_lines::{
    single_file, FileSystemSink, FileSystemSource, JsonLinesReader, JsonLinesWriter, MemorySource,
    Source,
};

// ── CLI definition ───────────────────────────────────────────────────

/// Validate JSON documents against a declarative schema.
#[derive(Parser)]
#[command(
    name = "okay",
    about = "Validate JSON Lines documents against a TOML schema",
    long_about = "Reports every problem in every document as one JSON message per line.\n\
                  Set RUST_LOG=debug for progress output on stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate every document of a file or directory (`-` reads stdin).
    Validate(ValidateArgs),
    /// Compile a schema file and list the paths it declares.
    Check(CheckArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// TOML schema file.
    #[arg(long, short)]
    schema: PathBuf,

    /// JSON Lines file, directory of files, or `-` for stdin.
    input: PathBuf,

    /// Write documents without findings here.
    #[arg(long)]
    accepted: Option<PathBuf>,

    /// Write documents with findings here.
    #[arg(long)]
    rejected: Option<PathBuf>,

    /// Do not report keys the schema does not declare.
    #[arg(long)]
    ignore_extra_fields: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// TOML schema file.
    #[arg(long, short)]
    schema: PathBuf,
}

/// What a successful run found.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Clean,
    Findings(usize),
}

// ── Entry point ──────────────────────────────────────────────────────

fn main() {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(&args),
        Command::Check(args) => run_check(&args),
    };

    match result {
        Ok(Outcome::Clean) => {}
        Ok(Outcome::Findings(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("okay: {}", e);
            std::process::exit(2);
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

fn load_schema(path: &std::path::Path, ignore_extra_fields: bool) -> OkayResult<Schema> {
    let mut file = SchemaFile::from_file(path)?;
    file.ignore_extra_fields |= ignore_extra_fields;
    file.compile(&CustomValidators::new())
}

fn run_validate(args: &ValidateArgs) -> OkayResult<Outcome> {
    let schema = load_schema(&args.schema, args.ignore_extra_fields)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.input.as_os_str() == "-" {
        let mut contents = Vec::new();
        io::stdin().read_to_end(&mut contents).map_err(|e| OkayError::Io {
            reason: format!("failed to read stdin: {}", e),
        })?;
        let source = MemorySource::new().with_store("-", contents);
        validate_source(source, &schema, args, &mut out)
    } else {
        validate_source(FileSystemSource::new(&args.input), &schema, args, &mut out)
    }
}

fn run_check(args: &CheckArgs) -> OkayResult<Outcome> {
    let schema = load_schema(&args.schema, false)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (path, field) in schema.fields() {
        let tags: Vec<&str> = field.tags().map(|tag| tag.name()).collect();
        let line = json!({
            "field": path,
            "strictness": field.strictness.as_str(),
            "nullable": field.nullable,
            "types": tags,
        });
        writeln!(out, "{}", line).map_err(write_error)?;
    }
    Ok(Outcome::Clean)
}

/// Validate every document of `source`, print findings to `out`, and route
/// documents to the configured sinks.
fn validate_source<S: Source>(
    source: S,
    schema: &Schema,
    args: &ValidateArgs,
    out: &mut dyn Write,
) -> OkayResult<Outcome> {
    let mut reader = JsonLinesReader::new(source);
    let mut accepted = args
        .accepted
        .as_ref()
        .map(|path| FileSystemSink::new(JsonLinesWriter, single_file(path)));
    let mut rejected = args
        .rejected
        .as_ref()
        .map(|path| FileSystemSink::new(JsonLinesWriter, single_file(path)));

    let mut documents = 0usize;
    let mut reported = 0usize;

    for document in reader.documents()? {
        let document = document?;
        documents += 1;

        let mut context = MessageContext::new();
        context.insert("store".to_string(), json!(document.store));
        context.insert("document_number".to_string(), json!(document.number));

        let messages = match validate(schema, &document.contents, Some(&context)) {
            Ok(messages) => messages,
            Err(OkayError::DocumentNotObject { .. }) => {
                let mut message = Message::new(kinds::INVALID_TYPE, ".")
                    .with_expected("object")
                    .with("found", describe(&document.contents));
                message.extend_context(&context);
                vec![message]
            }
            Err(e) => return Err(e),
        };

        let sink = if messages.is_empty() {
            accepted.as_mut()
        } else {
            rejected.as_mut()
        };
        if let Some(sink) = sink {
            sink.add(&document)?;
        }

        reported += messages.len();
        print_messages(out, &messages)?;
    }

    let malformed = reader.take_messages();
    reported += malformed.len();
    print_messages(out, &malformed)?;

    if let Some(sink) = accepted {
        sink.finish()?;
    }
    if let Some(sink) = rejected {
        sink.finish()?;
    }

    info!(documents, malformed = malformed.len(), messages = reported, "validation finished");

    Ok(if reported == 0 {
        Outcome::Clean
    } else {
        Outcome::Findings(reported)
    })
}

fn print_messages(out: &mut dyn Write, messages: &[Message]) -> OkayResult<()> {
    for message in messages {
        let line = serde_json::to_string(message).map_err(|e| OkayError::Io {
            reason: format!("failed to serialize message: {}", e),
        })?;
        writeln!(out, "{}", line).map_err(write_error)?;
    }
    Ok(())
}

fn write_error(e: io::Error) -> OkayError {
    OkayError::Io {
        reason: format!("failed to write output: {}", e),
    }
}
