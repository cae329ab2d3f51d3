//! Purpose: `init6` CLI entry point: load a capture, decode it, render the record.
//! Role: Binary crate root; parses args, loads input, emits text or JSON on stdout.
//! Invariants: Decoding goes through `init6::api` only; no partial records are printed.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod field_filter;
mod record_json;
mod record_text;

use field_filter::FieldFilter;
use init6::api::{
    DecodeOptions, Error, ErrorKind, decode_record_with, hexdump, init6_schema, to_exit_code,
};
use record_json::{layout_json, record_json};
use record_text::{render_layout, render_record};

/// Captures are a couple of kilobytes; anything far larger is not an init6 dump.
const MAX_INPUT_LEN: u64 = 16 * 1024 * 1024;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `init6 --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let result = match cli.command {
        Command::Decode(args) => run_decode(args, color_mode),
        Command::Layout(args) => run_layout(args),
    };

    result
        .map_err(add_decode_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "init6",
    version,
    about = "Decode and inspect Validity90 init6 records",
    long_about = None,
    after_help = r#"EXAMPLES
  $ init6 decode capture.bin
  $ init6 decode capture.txt --from hex --field data2 --field data7.signature
  $ init6 decode capture.bin --format json --strict
  $ init6 layout

Set RUST_LOG=debug to trace the decoder."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize output (auto: only when writing to a terminal)"
    )]
    color: ColorMode,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a capture and print its fields
    Decode(DecodeArgs),
    /// Print the record layout with offsets and lengths
    Layout(LayoutArgs),
}

#[derive(Args)]
struct DecodeArgs {
    #[arg(help = "Capture file, or - for stdin", value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,
    #[arg(long, value_enum, default_value = "auto", help = "Input encoding")]
    from: InputFormat,
    #[arg(long, value_enum, default_value = "text", help = "Output format")]
    format: OutputFormat,
    #[arg(
        long = "field",
        value_name = "PATH",
        help = "Only print this dotted field path (repeatable), e.g. data7.signature"
    )]
    fields: Vec<String>,
    #[arg(long, help = "Reject bytes after the last field")]
    strict: bool,
}

#[derive(Args)]
struct LayoutArgs {
    #[arg(long, value_enum, default_value = "text", help = "Output format")]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Binary unless the data is entirely printable text
    Auto,
    Bin,
    /// `XXXXXXXX: hh hh ...` dump lines or a plain hex stream
    Hex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_decode(args: DecodeArgs, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    let schema = init6_schema()?;
    let known: Vec<String> = schema.layout().into_iter().map(|entry| entry.path).collect();
    let filter = FieldFilter::new(args.fields);
    if let Some(unknown) = filter.paths().iter().find(|path| !known.contains(*path)) {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("unknown field path {unknown:?}"))
            .with_hint("Run `init6 layout` to list field paths."));
    }

    let raw = read_input(&args.input)?;
    let bytes = match args.from {
        InputFormat::Bin => raw,
        InputFormat::Hex => restore_hex(&raw)?,
        InputFormat::Auto if hexdump::looks_like_text(&raw) => restore_hex(&raw)?,
        InputFormat::Auto => raw,
    };
    debug!(input = %args.input.display(), len = bytes.len(), "loaded capture");

    let options = DecodeOptions {
        strict: args.strict,
    };
    let record = decode_record_with(&bytes, &options)?;

    match args.format {
        OutputFormat::Json => emit_json(&record_json(&record, &filter)),
        OutputFormat::Text => {
            let use_color = color_mode.use_color(io::stdout().is_terminal());
            print!("{}", render_record(&record, &filter, use_color));
        }
    }
    Ok(RunOutcome::ok())
}

fn run_layout(args: LayoutArgs) -> Result<RunOutcome, Error> {
    let schema = init6_schema()?;
    let layout = schema.layout();
    match args.format {
        OutputFormat::Json => emit_json(&layout_json(schema.name(), &layout)),
        OutputFormat::Text => print!("{}", render_layout(&layout)),
    }
    Ok(RunOutcome::ok())
}

fn read_input(path: &Path) -> Result<Vec<u8>, Error> {
    let io_err = |err: io::Error| {
        Error::new(ErrorKind::Io)
            .with_message(format!("failed to read {}", path.display()))
            .with_source(err)
    };

    let mut buf = Vec::new();
    if path == Path::new("-") {
        io::stdin()
            .lock()
            .take(MAX_INPUT_LEN + 1)
            .read_to_end(&mut buf)
            .map_err(io_err)?;
    } else {
        let file = File::open(path).map_err(io_err)?;
        file.take(MAX_INPUT_LEN + 1)
            .read_to_end(&mut buf)
            .map_err(io_err)?;
    }

    if buf.len() as u64 > MAX_INPUT_LEN {
        return Err(Error::new(ErrorKind::InvalidInput)
            .with_message(format!(
                "{} is larger than {MAX_INPUT_LEN} bytes",
                path.display()
            ))
            .with_hint("Pass a single init6 capture."));
    }
    Ok(buf)
}

fn restore_hex(raw: &[u8]) -> Result<Vec<u8>, Error> {
    let text = std::str::from_utf8(raw).map_err(|err| {
        Error::new(ErrorKind::InvalidInput)
            .with_message("hex input is not valid UTF-8")
            .with_source(err)
    })?;
    hexdump::restore(text)
}

fn add_decode_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::UnexpectedEof => {
            err.with_hint("Capture is truncated. Check that the whole init6 reply was saved.")
        }
        ErrorKind::ConstantMismatch => err.with_hint(
            "Capture does not look like an init6 reply. Try `--from hex` or `--from bin`.",
        ),
        ErrorKind::TrailingData => {
            err.with_hint("Drop --strict to ignore bytes after the record.")
        }
        ErrorKind::Io => err.with_hint("I/O error. Check the path and permissions."),
        _ => err,
    }
}

fn emit_json(value: &Value) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::InvalidInput => "invalid input".to_string(),
        ErrorKind::UnexpectedEof => "unexpected end of data".to_string(),
        ErrorKind::ConstantMismatch => "constant mismatch".to_string(),
        ErrorKind::TrailingData => "trailing data".to_string(),
        ErrorKind::InvalidSchema => "invalid schema".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
    }
    if let Some(needed) = err.needed() {
        inner.insert("needed".to_string(), json!(needed));
    }
    if let Some(available) = err.available() {
        inner.insert("available".to_string(), json!(available));
    }
    if let Some(expected) = err.expected() {
        inner.insert("expected".to_string(), json!(hex::encode(expected)));
    }
    if let Some(actual) = err.actual() {
        inner.insert("actual".to_string(), json!(hex::encode(actual)));
    }
    if let Some(extra) = err.extra() {
        inner.insert("extra".to_string(), json!(extra));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(field) = err.field() {
        lines.push(format!(
            "{} {field}",
            colorize_label("field:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(offset) = err.offset() {
        lines.push(format!(
            "{} {offset}",
            colorize_label("offset:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
