// qmark - repair question-mark mangled attachment filenames
//
// Reads a listing of mangled paths, looks up each item's real attachment
// names, and prints a bash script of `mv` commands on stdout. Everything
// that needs a human goes to stderr.

mod exit_codes;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qmark_recon::engine::DEFAULT_JOBS;
use qmark_recon::script::{render, SCRIPT_HEADER};
use qmark_recon::{parse_lines, run, PathLayout, ReconError, RunOptions, RunSummary};
use qmark_vault_client::{
    resolve_token, Credentials, VaultClient, VaultError, BASE_URL_ENV, DEFAULT_BASE_URL,
    DEFAULT_TOKEN_FILE, TOKEN_ENV,
};

use exit_codes::{EXIT_ERROR, EXIT_FETCH_FAILED, EXIT_INPUT, EXIT_NOT_AUTH, EXIT_SUCCESS, EXIT_USAGE};

const LOG_ENV: &str = "QMARK_LOG";

#[derive(Parser, Debug)]
#[command(name = "qmark")]
#[command(about = "Print a bash script that renames question-mark mangled attachments")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Each input line is {owner}/{item id}/{version}/{filename}. The filename may
contain '/'. Use --prefix-depth when more than one segment precedes the id.

Rename commands go to stdout; literal matches, unmatched and ambiguous
names, and fetch failures go to stderr.

Examples:
  qmark > fix.sh
  qmark qmark-files.txt --token-file ~/.vault-token > fix.sh
  qmark listing.txt --prefix-depth 2 --jobs 16 > fix.sh
  QMARK_LOG=debug qmark listing.txt > fix.sh")]
struct Cli {
    /// Listing of mangled paths, one per line
    #[arg(default_value = "qmark-files.txt")]
    input: PathBuf,

    /// File holding the API token
    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    token_file: PathBuf,

    /// API token (overrides --token-file)
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Repository base URL
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Path segments before the item id
    #[arg(long, default_value_t = 1)]
    prefix_depth: usize,

    /// Items fetched concurrently
    #[arg(long, default_value_t = DEFAULT_JOBS as u16, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: u16,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  qmark-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match execute(&cli, &mut io::stdout(), &mut io::stderr()) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr so stdout stays a clean script. `log` records from the
/// library crates are bridged in by the subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn auth(err: VaultError) -> Self {
        Self {
            code: EXIT_NOT_AUTH,
            message: format!("no API token: {}", err),
            hint: Some("write the token to .token, or pass --token / QMARK_TOKEN".into()),
        }
    }

    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::Parse(_) => {
                Some("expected {owner}/{item id}/{version}/{filename}; see --prefix-depth".to_string())
            }
            ReconError::Io(_) => None,
        };
        Self { code: EXIT_INPUT, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Full run: token, parse, header, fetch + match, render.
fn execute(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<RunSummary, CliError> {
    if !(cli.base_url.starts_with("https://") || cli.base_url.starts_with("http://")) {
        return Err(CliError::usage(format!("--base-url must be an http(s) URL, got {:?}", cli.base_url)));
    }

    let token = resolve_token(cli.token.as_deref(), &cli.token_file).map_err(CliError::auth)?;

    let file = File::open(&cli.input).map_err(|e| {
        CliError::input(format!("cannot read {}: {}", cli.input.display(), e))
            .with_hint("pass the listing path as the first argument")
    })?;
    let groups = parse_lines(BufReader::new(file), PathLayout::new(cli.prefix_depth))
        .map_err(CliError::recon)?;
    let record_count = groups.record_count();

    // Header goes out before any fetch starts.
    writeln!(stdout, "{}", SCRIPT_HEADER)
        .and_then(|_| stdout.flush())
        .map_err(|e| CliError::io(format!("cannot write script: {}", e)))?;

    let client = VaultClient::new(Credentials::new(token, cli.base_url.clone()));
    let options = RunOptions { jobs: usize::from(cli.jobs) };

    let mut write_error: Option<io::Error> = None;
    let summary = run(groups, &client, &options, |report| {
        if write_error.is_some() {
            return;
        }
        let rendered = render(report);
        let result = write_lines(stdout, &rendered.commands)
            .and_then(|_| write_lines(stderr, &rendered.diagnostics));
        if let Err(e) = result {
            write_error = Some(e);
        }
    });

    if let Some(e) = write_error {
        return Err(CliError::io(format!("cannot write script: {}", e)));
    }

    log::info!("{} records from {}", record_count, cli.input.display());

    if summary.failed > 0 {
        return Err(CliError {
            code: EXIT_FETCH_FAILED,
            message: format!("{} of {} items could not be fetched", summary.failed, summary.groups),
            hint: Some("the printed script covers the items that were fetched".into()),
        });
    }

    Ok(summary)
}

fn write_lines(w: &mut dyn Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(w, "{}", line)?;
    }
    w.flush()
}
