//! CLI definition, request assembly, tracing setup, and progress spinner.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use searchweb_core::{ProgressReporter, SearchParams, SearchRequest};
use searchweb_shared::{AppConfig, SearchMode, load_config, load_config_from, validate_max_results};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// searchweb — web search + cited summary via OpenRouter's web plugin.
#[derive(Parser, Debug)]
#[command(
    name = "searchweb",
    version,
    about = "Web search + summary via OpenRouter Web plugin (prints assistant content).",
    long_about = None,
)]
pub(crate) struct Cli {
    /// What to search for.
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub query: String,

    /// How many web results the plugin can use (1-20).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub max_results: Option<u8>,

    /// OpenRouter model id (defaults to the configured model).
    #[arg(long)]
    pub model: Option<String>,

    /// Language code used in the prompt (defaults to the configured language).
    #[arg(long)]
    pub lang: Option<String>,

    /// Search strategy: auto, simple (1 pass), or deep (3 passes + synthesis).
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Path to a searchweb.toml config file.
    #[arg(long, env = "SEARCHWEB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// `--mode` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ModeArg {
    Auto,
    Simple,
    Deep,
}

impl From<ModeArg> for SearchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => Self::Auto,
            ModeArg::Simple => Self::Simple,
            ModeArg::Deep => Self::Deep,
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// only the answer.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "searchweb=warn",
        1 => "searchweb=info",
        2 => "searchweb=debug",
        _ => "searchweb=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run one search and print the outcome.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let request = build_request(&cli, &config)?;
    let api_key = config.openrouter.api_key();

    info!(
        mode = %request.mode,
        model = %request.params.model,
        lang = %request.params.lang,
        max_results = request.params.max_results,
        "starting search"
    );

    let reporter = CliProgress::new();
    let outcome = searchweb_core::run_search(&request, &config, api_key, &reporter).await?;

    println!("{}", outcome.text().trim_end());
    Ok(())
}

/// Merge CLI flags over config defaults.
pub(crate) fn build_request(cli: &Cli, config: &AppConfig) -> Result<SearchRequest> {
    let max_results = validate_max_results(
        cli.max_results.unwrap_or(config.defaults.max_results),
    )?;

    Ok(SearchRequest {
        query: cli.query.clone(),
        mode: cli.mode.map(SearchMode::from).unwrap_or(config.defaults.mode),
        params: SearchParams {
            model: cli
                .model
                .clone()
                .unwrap_or_else(|| config.openrouter.default_model.clone()),
            lang: cli
                .lang
                .clone()
                .unwrap_or_else(|| config.defaults.lang.clone()),
            max_results,
        },
    })
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}
