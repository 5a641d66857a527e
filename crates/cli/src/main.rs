// colstat - summary statistics for one column of a spreadsheet

mod exit_codes;
mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use colstat_ai::ChatConfig;
use colstat_config::ai::{AIDiagnostics, MissingCredentials, ResolvedAIConfig};
use colstat_config::settings::{AIProvider, Settings};
use colstat_engine::column::{self, ColumnError, ColumnSelector, NumericSeries};
use colstat_engine::stats::summarize;
use colstat_engine::table::Table;
use colstat_io::{LoadError, ReadOptions};

use exit_codes::{
    EXIT_AI_MISSING_KEY, EXIT_ERROR, EXIT_INSUFFICIENT_COLUMNS, EXIT_NOT_FOUND,
    EXIT_NO_NUMERIC_DATA, EXIT_PARSE, EXIT_SUCCESS, EXIT_UNKNOWN_COLUMN, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "colstat")]
#[command(about = "Summary statistics for one column of a spreadsheet")]
#[command(version)]
#[command(subcommand_required = false)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Settings file (default: <config dir>/colstat/settings.json)
    #[arg(long, global = true, env = "COLSTAT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    // Arguments for the default `stats` command
    #[command(flatten)]
    input: InputArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Debug, Default)]
struct InputArgs {
    /// Spreadsheet to read: xlsx, xlsm, xls, xlsb, ods, csv, tsv (default: input.xlsx)
    file: Option<PathBuf>,

    /// Column to analyze: zero-based index, @LETTER, or header name (default: 2, column C)
    #[arg(long, short = 'c', value_name = "SEL")]
    column: Option<String>,

    /// First row is data, not headers
    #[arg(long)]
    no_headers: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a column: count, sum, min, max, average
    #[command(after_help = "\
Examples:
  colstat stats
  colstat stats sales.xlsx --column Amount
  colstat stats export.csv --column @D --json")]
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Ask an AI model for the column average, falling back to local arithmetic
    #[command(after_help = "\
The API key is read from the system keychain, COLSTAT_OPENAI_KEY, or
OPENAI_API_KEY (a .env file in the working directory is loaded first).
A failed or unparsable AI response is not an error: the local average is
reported instead and the exit code is 0.

Examples:
  colstat ai-average
  colstat ai-average sales.xlsx --model gpt-4o
  colstat ai-average --provider local --model llama3:8b")]
    AiAverage {
        #[command(flatten)]
        input: InputArgs,

        /// AI provider (overrides settings)
        #[arg(long)]
        provider: Option<ProviderArg>,

        /// Model identifier (overrides settings)
        #[arg(long)]
        model: Option<String>,

        /// Chat-completions base URL (overrides settings)
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },

    /// AI configuration and diagnostics
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Check AI configuration (no network calls)
    Doctor {
        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Openai,
    Local,
}

impl From<ProviderArg> for AIProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => AIProvider::OpenAI,
            ProviderArg::Local => AIProvider::Local,
        }
    }
}

fn main() -> ExitCode {
    // Working directory only; may set RUST_LOG, so it loads first
    let _ = dotenvy::from_path(".env");

    // RUST_LOG=debug shows request/response details
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        None => cmd_stats(config, cli.input),
        Some(Commands::Stats { input }) => cmd_stats(config, input),
        Some(Commands::AiAverage { input, provider, model, endpoint }) => {
            cmd_ai_average(config, input, provider, model, endpoint)
        }
        Some(Commands::Ai { command }) => match command {
            AiCommands::Doctor { json } => cmd_ai_doctor(config, json),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
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

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(err: io::Error) -> Self {
        Self { code: EXIT_ERROR, message: err.to_string(), hint: None }
    }

    /// File-level failure with its exit code
    pub fn load(err: LoadError) -> Self {
        let message = err.to_string();
        match err {
            LoadError::NotFound(_) => Self { code: EXIT_NOT_FOUND, message, hint: None }
                .with_hint("pass a file path, or set \"input\" in settings.json"),
            LoadError::Parse { .. } => Self { code: EXIT_PARSE, message, hint: None },
        }
    }

    /// Column-level failure with its exit code
    pub fn column(err: ColumnError) -> Self {
        let message = err.to_string();
        match err {
            ColumnError::InsufficientColumns { .. } => {
                Self { code: EXIT_INSUFFICIENT_COLUMNS, message, hint: None }
                    .with_hint("choose another column with --column")
            }
            ColumnError::UnknownColumn { available, .. } => {
                let hint = if available.is_empty() {
                    "the file has no header row; select by index or @LETTER".to_string()
                } else {
                    format!("available columns: {}", available.join(", "))
                };
                Self { code: EXIT_UNKNOWN_COLUMN, message, hint: Some(hint) }
            }
            ColumnError::NoNumericData { .. } => {
                Self { code: EXIT_NO_NUMERIC_DATA, message, hint: None }
            }
        }
    }

    pub fn missing_credentials(err: MissingCredentials) -> Self {
        Self {
            code: EXIT_AI_MISSING_KEY,
            message: err.to_string(),
            hint: Some(err.hint()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared pipeline
// ============================================================================

/// Fully resolved inputs for one run
struct Job {
    path: PathBuf,
    selector: ColumnSelector,
    read: ReadOptions,
    json: bool,
}

impl Job {
    /// Command-line flags win over settings, settings over defaults
    fn resolve(settings: &Settings, args: &InputArgs) -> Result<Self, CliError> {
        let path = args.file.clone().unwrap_or_else(|| settings.input_path());

        let selector = match &args.column {
            Some(s) => s.parse::<ColumnSelector>(),
            None => settings.column_selector(),
        }
        .map_err(|e| CliError::args(format!("invalid column selector: {}", e)))?;

        let read = ReadOptions {
            headers: settings.headers && !args.no_headers,
        };

        tracing::debug!(path = %path.display(), column = %selector, headers = read.headers, "resolved input");

        Ok(Self { path, selector, read, json: args.json })
    }
}

/// Output of load + extract
struct LoadedColumn {
    table: Table,
    series: NumericSeries,
    label: String,
}

fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    Settings::load(config).map_err(|e| {
        CliError::args(e).with_hint("fix or remove the settings file, or pass --config")
    })
}

/// Load the table and extract the selected column, reporting progress unless
/// the output is JSON.
fn load_column(job: &Job, out: &mut impl Write) -> Result<LoadedColumn, CliError> {
    let table = colstat_io::load(&job.path, &job.read).map_err(CliError::load)?;
    if !job.json {
        report::write_loaded(out, &job.path, &table).map_err(CliError::io)?;
    }

    let series = column::extract_numeric_column(&table, &job.selector).map_err(CliError::column)?;
    let index = column::resolve_column(&table, &job.selector).map_err(CliError::column)?;
    let label = table.column_label(index);

    if !job.json {
        report::write_found(out, &series, &label).map_err(CliError::io)?;
    }

    Ok(LoadedColumn { table, series, label })
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(io::Error::new(io::ErrorKind::Other, e)))?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// stats
// ============================================================================

fn cmd_stats(config: Option<&Path>, input: InputArgs) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let job = Job::resolve(&settings, &input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !job.json {
        report::write_banner(&mut out, "Column Stats").map_err(CliError::io)?;
    }

    let loaded = load_column(&job, &mut out)?;
    let stats = summarize(&loaded.series);

    if job.json {
        return print_json(&report::stats_json(&job.path, &loaded.table, &loaded.label, &stats));
    }

    report::write_results(&mut out, &stats).map_err(CliError::io)
}

// ============================================================================
// ai-average
// ============================================================================

fn cmd_ai_average(
    config: Option<&Path>,
    input: InputArgs,
    provider: Option<ProviderArg>,
    model: Option<String>,
    endpoint: Option<String>,
) -> Result<(), CliError> {
    let settings = load_settings(config)?;

    let mut ai_settings = settings.ai.clone();
    if let Some(provider) = provider {
        ai_settings.provider = provider.into();
    }
    if let Some(model) = model {
        ai_settings.model = model;
    }
    if let Some(endpoint) = endpoint {
        ai_settings.endpoint = Some(endpoint);
    }

    // Credentials first: fail before touching the input file
    let resolved = ResolvedAIConfig::from_settings(&ai_settings);
    let api_key = resolved
        .require_credentials()
        .map_err(CliError::missing_credentials)?;
    tracing::debug!(
        provider = resolved.provider.name(),
        model = %resolved.model,
        endpoint = %resolved.endpoint,
        key_source = resolved.key_source.as_str(),
        "resolved AI config"
    );

    let job = Job::resolve(&settings, &input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !job.json {
        report::write_banner(&mut out, "Column Stats (AI)").map_err(CliError::io)?;
    }

    let loaded = load_column(&job, &mut out)?;
    let stats = summarize(&loaded.series);

    if !job.json {
        writeln!(
            out,
            "\nAsking {} ({}) for the average...",
            resolved.provider.name(),
            resolved.model
        )
        .map_err(CliError::io)?;
        out.flush().map_err(CliError::io)?;
    }

    let chat = ChatConfig {
        endpoint: resolved.endpoint.clone(),
        model: resolved.model.clone(),
        api_key,
    };
    let estimate = colstat_ai::estimate_average(&chat, &loaded.series);

    for warning in &estimate.warnings {
        eprintln!("warning: {}", warning);
    }
    if estimate.is_fallback() {
        tracing::debug!(reply = ?estimate.raw_response, "remote estimate fell back");
    }

    if job.json {
        return print_json(&report::remote_json(
            &job.path,
            &loaded.table,
            &loaded.label,
            &stats,
            &estimate,
        ));
    }

    report::write_results(&mut out, &stats).map_err(CliError::io)?;
    report::write_comparison(&mut out, &estimate, stats.mean).map_err(CliError::io)
}

// ============================================================================
// ai doctor
// ============================================================================

fn cmd_ai_doctor(config: Option<&Path>, json: bool) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let resolved = ResolvedAIConfig::from_settings(&settings.ai);
    let diag = AIDiagnostics::from_resolved(&resolved);

    if json {
        print_json(&serde_json::json!({
            "schema_version": 1,
            "status": diag.status(),
            "provider": diag.provider,
            "model": diag.model,
            "endpoint": diag.endpoint,
            "key": if !diag.key_required {
                "not_required"
            } else if diag.key_present {
                "present"
            } else {
                "missing"
            },
            "key_source": diag.key_source.as_str(),
            "keychain": if diag.keychain_available { "ok" } else { "unavailable" },
        }))?;
    } else {
        println!("{}", diag);
    }

    match resolved.require_credentials() {
        Ok(_) => Ok(()),
        // Report already printed; exit code carries the status
        Err(err) => Err(CliError {
            code: EXIT_AI_MISSING_KEY,
            message: String::new(),
            hint: Some(err.hint()),
        }),
    }
}
