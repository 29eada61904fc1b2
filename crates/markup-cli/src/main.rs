use clap::{ArgAction, Parser, Subcommand};
use markup_lexer::{Diagnostic, ErrorsEmitted, Log, Scanner, Source};
use markup_parser::{DoctypeMode, ParseOptions};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "markup")]
#[command(about = "Tokenizer and doctype parser for HTML-like markup")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a file
    Tokens {
        /// Input markup file
        path: PathBuf,
    },

    /// Check a file for errors and warnings
    Check {
        /// Input markup file
        path: PathBuf,

        /// Skip the doctype name and require a separate value run
        #[arg(long)]
        reference_doctype: bool,
    },

    /// Parse a file and print the syntax tree back as markup
    Print {
        /// Input markup file
        path: PathBuf,

        /// Skip the doctype name and require a separate value run
        #[arg(long)]
        reference_doctype: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Diagnostics(#[from] ErrorsEmitted),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Tokens { path } => cmd_tokens(&path),
        Command::Check {
            path,
            reference_doctype,
        } => cmd_check(&path, options(reference_doctype)),
        Command::Print {
            path,
            reference_doctype,
        } => cmd_print(&path, options(reference_doctype)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn options(reference_doctype: bool) -> ParseOptions {
    let doctype = if reference_doctype {
        DoctypeMode::Reference
    } else {
        DoctypeMode::Captured
    };
    ParseOptions { doctype }
}

fn read_source(path: &Path) -> Result<Source, CliError> {
    if !path.exists() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "read source");
    Ok(Source::new(path.display().to_string(), contents))
}

/// Render a diagnostic as `label:line:column: severity: message`.
fn render(source: &Source, diagnostic: &Diagnostic) -> String {
    let (line, column) = source.line_column(diagnostic.range.start);
    format!("{}:{line}:{column}: {diagnostic}", source.label)
}

fn report(source: &Source, log: &Log) {
    for diagnostic in log.diagnostics() {
        eprintln!("{}", render(source, diagnostic));
    }
}

fn cmd_tokens(path: &Path) -> Result<(), CliError> {
    let source = read_source(path)?;
    let mut log = Log::new();
    let tokens = Scanner::tokenize(&mut log, &source);

    for token in &tokens {
        println!(
            "{}..{} {:?} {:?}",
            token.range.start,
            token.range.end(),
            token.kind,
            token.text(&source.contents)
        );
    }

    report(&source, &log);
    log.check()?;
    Ok(())
}

fn cmd_check(path: &Path, options: ParseOptions) -> Result<(), CliError> {
    let source = read_source(path)?;
    let mut log = Log::new();
    markup_parser::parse(&mut log, &source, options);

    report(&source, &log);
    log.check()?;

    eprintln!("OK: {} ({} warning(s))", source.label, log.warning_count());
    Ok(())
}

fn cmd_print(path: &Path, options: ParseOptions) -> Result<(), CliError> {
    let source = read_source(path)?;
    let mut log = Log::new();
    let ast = markup_parser::parse(&mut log, &source, options);

    report(&source, &log);
    log.check()?;

    println!("{}", markup_printer::print(&ast));
    Ok(())
}
