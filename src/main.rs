//! Job-Harvest main entry point
//!
//! This is the command-line interface for the Job-Harvest job-board harvester.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use job_harvest::auth::{AuthError, Authenticator, Credentials};
use job_harvest::config::{load_or_init, save_config, set_setting, Config};
use job_harvest::crawler::{Coordinator, CrawlSettings};
use job_harvest::output::{print_summary, ExportFormat, FileExporter, RunSummary};
use job_harvest::source::{BrowserSession, HttpPageSource, PageSource};
use job_harvest::{DetailLevel, SearchTerm};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the login password
const PASSWORD_ENV: &str = "JOB_HARVEST_PASSWORD";

/// Job-Harvest: a polite job-board harvester
///
/// Job-Harvest paginates a job board's search results for one or more
/// search terms, optionally follows every result to its detail page, and
/// exports the records per term as JSON, CSV, Parquet or SQLite.
#[derive(Parser, Debug)]
#[command(name = "job-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite job-board harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (created with defaults if missing)
    #[arg(short, long, global = true, default_value = "job-harvest.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl one or more search terms and export the results
    Crawl(CrawlArgs),

    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct CrawlArgs {
    /// Search terms (comma-separated lists allowed); prompted for when omitted
    #[arg(value_name = "TERMS")]
    terms: Vec<String>,

    /// Detail level: 1 = listing only, 2 = detail page, 3 = detail page + description
    #[arg(short = 'l', long)]
    detail_level: Option<DetailLevel>,

    /// Export format: json, csv, parquet (columnar) or sqlite
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Show the browser window
    #[arg(long, conflicts_with = "http")]
    headed: bool,

    /// Fetch pages over plain HTTP instead of a browser (no login)
    #[arg(long)]
    http: bool,

    /// Skip logging in
    #[arg(long)]
    no_login: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration (password masked)
    Show,

    /// Change one setting, e.g. `crawler.detail-level 3`, and save it
    Set {
        /// Setting as `section.key`
        key: String,
        /// New value (empty clears optional settings)
        value: String,
    },

    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Config { action } => handle_config(&cli.config, action),
        Command::Crawl(args) => handle_crawl(&cli.config, args).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_harvest=info,warn"),
            1 => EnvFilter::new("job_harvest=debug,info"),
            2 => EnvFilter::new("job_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `config` subcommands
fn handle_config(path: &Path, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = load_or_init(path)?;
            print!("{}", toml::to_string_pretty(&config.masked())?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_or_init(path)?;
            set_setting(&mut config, &key, &value)?;
            save_config(path, &config)?;

            let shown = if key == "auth.password" && !value.is_empty() {
                "********"
            } else {
                value.as_str()
            };
            println!("Set {} = {}", key, shown);
        }
    }
    Ok(())
}

/// Handles the `crawl` subcommand
async fn handle_crawl(path: &Path, args: CrawlArgs) -> anyhow::Result<()> {
    let mut config = load_or_init(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded from {}", path.display());

    if args.headed {
        config.browser.headless = false;
    }

    let terms = if args.terms.is_empty() {
        prompt_terms()?
    } else {
        SearchTerm::parse_list(&args.terms.join(","))
    };
    if terms.is_empty() {
        bail!("No search terms given");
    }

    let mut settings = CrawlSettings::from_config(&config)?;
    if let Some(level) = args.detail_level {
        settings = settings.with_level(level);
    }

    let mut exporter = FileExporter::from_config(&config.output);
    if let Some(format) = args.format {
        exporter = exporter.with_format(format);
    }

    tracing::info!(
        "Crawling {} term(s) at detail level {}, exporting as {}",
        terms.len(),
        settings.level,
        exporter.format()
    );

    let summary = if args.http {
        if !args.no_login && config.auth.auto_login {
            tracing::warn!("Plain HTTP mode cannot log in; continuing unauthenticated");
        }
        let source = HttpPageSource::new(&config.browser)?;
        run_with_source(source, &config, settings, &mut exporter, &terms, false).await?
    } else {
        let source = BrowserSession::launch(&config.browser)
            .await
            .context("Failed to start the browser")?;
        run_with_source(source, &config, settings, &mut exporter, &terms, !args.no_login).await?
    };

    print_summary(&summary);
    Ok(())
}

/// Runs login and crawl on `source`, then releases it whatever happened
async fn run_with_source<S: PageSource>(
    mut source: S,
    config: &Config,
    settings: CrawlSettings,
    exporter: &mut FileExporter,
    terms: &[SearchTerm],
    login: bool,
) -> anyhow::Result<RunSummary> {
    let outcome = crawl_session(&mut source, config, settings, exporter, terms, login).await;

    if let Err(e) = source.close().await {
        tracing::warn!("Failed to release page source: {}", e);
    }

    outcome
}

async fn crawl_session<S: PageSource>(
    source: &mut S,
    config: &Config,
    settings: CrawlSettings,
    exporter: &mut FileExporter,
    terms: &[SearchTerm],
    login: bool,
) -> anyhow::Result<RunSummary> {
    if login {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => bail!("Interrupted during login"),
            result = authenticate(source, config) => result?,
        }
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let summary = Coordinator::new(source, exporter, settings)
        .run_until(terms, shutdown)
        .await;
    Ok(summary)
}

/// Logs in with stored or prompted credentials according to the auth policy
async fn authenticate<S: PageSource>(source: &mut S, config: &Config) -> anyhow::Result<()> {
    let authenticator = Authenticator::new(&config.site, &config.auth)?;

    let stored = if config.auth.auto_login {
        Credentials::from_config(&config.auth)
    } else {
        None
    };

    let result = match stored {
        Some(credentials) => {
            tracing::info!("Logging in as {} (auto-login)", credentials.username);
            authenticator
                .login_with_attempts(source, |_, last| match last {
                    None | Some(AuthError::Timeout(_)) => Some(credentials.clone()),
                    Some(_) => None,
                })
                .await
        }
        None => {
            if !config.auth.required && !confirm("Log in before crawling? [y/N] ") {
                tracing::info!("Continuing without login");
                return Ok(());
            }
            authenticator
                .login_with_attempts(source, |attempt, last| {
                    if let Some(e) = last {
                        eprintln!("Login failed: {}", e);
                    }
                    let env_password = match last {
                        Some(AuthError::InvalidCredentials) => None,
                        _ => std::env::var(PASSWORD_ENV).ok(),
                    };
                    prompt_credentials(config, attempt, env_password)
                })
                .await
        }
    };

    match result {
        Ok(_) => Ok(()),
        Err(e) if config.auth.required => {
            Err(anyhow::Error::new(e).context("Login is required (auth.required = true)"))
        }
        Err(e) => {
            tracing::warn!("{}; continuing unauthenticated", e);
            Ok(())
        }
    }
}

/// Reads one trimmed line from stdin after printing `prompt`
///
/// Returns `None` on end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks for search terms until at least one non-empty term is given
fn prompt_terms() -> anyhow::Result<Vec<SearchTerm>> {
    loop {
        let Some(line) = read_line("Search terms (comma-separated): ")? else {
            bail!("No search terms given");
        };
        let terms = SearchTerm::parse_list(&line);
        if !terms.is_empty() {
            return Ok(terms);
        }
        eprintln!("Please enter at least one search term.");
    }
}

fn confirm(prompt: &str) -> bool {
    matches!(
        read_line(prompt),
        Ok(Some(answer)) if matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
    )
}

/// Prompts for login credentials; `None` stops further attempts
fn prompt_credentials(
    config: &Config,
    attempt: u32,
    env_password: Option<String>,
) -> Option<Credentials> {
    let default_user = config.auth.username.clone().unwrap_or_default();
    let prompt = if default_user.is_empty() {
        format!("Email (attempt {}): ", attempt)
    } else {
        format!("Email [{}] (attempt {}): ", default_user, attempt)
    };

    let entered = read_line(&prompt).ok().flatten()?;
    let username = if entered.is_empty() {
        default_user
    } else {
        entered
    };
    if username.is_empty() {
        return None;
    }

    let password = match env_password.filter(|p| !p.is_empty()) {
        Some(password) => password,
        None => read_line("Password: ").ok().flatten()?,
    };

    Some(Credentials::new(username, password))
}
