use std::error::Error;
use std::fs;
use std::io::{self, Write};

use clap::Parser;
use json5_stream::{DecodeOptions, Dialect, EncodeOptions, Indent, Quote, Value};

#[derive(Parser, Debug)]
#[command(name = "json5s", version, about = "JSON5 validator and formatter")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Pretty-print with one element per line.
    #[arg(long)]
    pretty: bool,

    /// Indentation size for --pretty (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Quote strings with single quotes (JSON5 output only).
    #[arg(long = "single-quotes")]
    single_quotes: bool,

    /// Write JSON5 (bare keys, NaN and Infinity) instead of JSON.
    #[arg(long)]
    json5: bool,

    /// Accept strict JSON only.
    #[arg(long)]
    strict: bool,

    /// Validate the input and print "ok" instead of the formatted document.
    #[arg(long)]
    check: bool,

    /// Log parsing progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

impl InputSource {
    fn from_arg(input: Option<&str>) -> Self {
        match input {
            None | Some("-") => InputSource::Stdin,
            Some(path) => InputSource::File(path.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            InputSource::Stdin => "stdin",
            InputSource::File(path) => path,
        }
    }
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    if let Err(err) = simple_logger::init_with_level(level) {
        eprintln!("ERROR  {err}");
    }
    if let Err(err) = run(&args) {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let source = InputSource::from_arg(args.input.as_deref());
    let value = read_value(&source, &decode_options(args))?;
    log::debug!("parsed {} as {}", source.label(), value.type_name());

    if args.check {
        println!("ok");
        return Ok(());
    }

    let text = json5_stream::value_to_string(&value, &encode_options(args));
    with_output_writer(args.output.as_deref(), |writer| {
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    })?;
    if let Some(path) = args.output.as_deref().filter(|path| *path != "-") {
        log::info!("formatted {} into {path}", source.label());
    }
    Ok(())
}

fn decode_options(args: &Args) -> DecodeOptions {
    if args.strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::default()
    }
}

fn encode_options(args: &Args) -> EncodeOptions {
    let dialect = if args.json5 {
        Dialect::Json5
    } else {
        Dialect::Json
    };
    let quote = if args.single_quotes {
        Quote::Single
    } else {
        Quote::Double
    };
    EncodeOptions::new()
        .with_dialect(dialect)
        .with_pretty(args.pretty)
        .with_indent(Indent::Spaces(args.indent))
        .with_quote(quote)
}

fn read_value(source: &InputSource, options: &DecodeOptions) -> Result<Value, Box<dyn Error>> {
    let value = match source {
        InputSource::Stdin => {
            json5_stream::parse_reader_with_options(io::stdin().lock(), options)?
        }
        InputSource::File(path) => {
            let file = fs::File::open(path).map_err(|err| format!("{path}: {err}"))?;
            json5_stream::parse_reader_with_options(file, options)?
        }
    };
    Ok(value)
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}
