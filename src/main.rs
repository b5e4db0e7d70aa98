use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info, warn};

use urlsum::config::{Config, Settings, config_path};
use urlsum::page::HttpPageFetcher;
use urlsum::summarize::ChatCompletions;
use urlsum::transcript::InnerTubeTranscripts;
use urlsum::{Credential, Pipeline};

mod cli;

use cli::{Cli, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("urlsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("urlsum")
        .join("logs")
}

fn build_after_help() -> String {
    let log_path = log_dir().join("urlsum.log");
    format!(
        "\nENVIRONMENT:\n  GROQ_API_KEY   completion API key (also read from ./.env)\n\nConfig: {}\nLogs are written to: {}",
        config_path().display(),
        log_path.display()
    )
}

fn resolve_settings(cli: &Cli) -> Settings {
    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        Config::default()
    });

    let mut settings = Settings::from_config(config, Credential::from_env());

    // CLI flags take priority
    if let Some(ref model) = cli.model {
        settings.model = model.clone();
    }
    if !cli.langs.is_empty() {
        settings.languages = cli.langs.clone();
    }
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG, so load it before the logger reads the environment
    let dotenv = dotenvy::dotenv();
    setup_logging()?;

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Could not read .env: {e}"),
    }

    let cmd = <Cli as clap::CommandFactory>::command().after_help(build_after_help());
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let settings = resolve_settings(&cli);

    let client = reqwest::Client::new();
    let transcripts = InnerTubeTranscripts::new(client.clone());
    let pages = HttpPageFetcher::new(&settings.user_agent)?;
    let completions = ChatCompletions::new(client, settings.base_url.clone(), settings.model.clone());
    let pipeline = Pipeline::new(settings, transcripts, pages, completions);

    if cli.verbose {
        let settings = pipeline.settings();
        eprintln!(
            "Model: {}\nEndpoint: {}\nLanguages: {}\nCredential: {}",
            settings.model,
            settings.base_url,
            settings.languages.join(", "),
            if settings.credential.is_some() { "set" } else { "missing" },
        );
    }

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL provided\n\nUsage: urlsum <URL>\n       echo <URL> | urlsum");
    }

    let mut failures = 0usize;
    for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        if cli.verbose {
            eprintln!("Summarizing {url} ...");
        }

        // Requests run one at a time; later URLs wait for the current one
        let outcome = pipeline.run(url).await;

        if cli.verbose {
            eprintln!("State: {}", outcome.stage);
        }
        if cli.show_prompt {
            if let Some(ref prompt) = outcome.prompt {
                eprintln!("--- Prompt ---\n{prompt}\n--------------");
            }
        }

        let rendered = match cli.format {
            OutputFormat::Text => urlsum::output::render_text(&outcome),
            OutputFormat::Json => urlsum::output::render_json(&outcome),
        };
        println!("{rendered}");

        if !outcome.succeeded() {
            failures += 1;
        }
    }

    if failures > 0 {
        debug!("{failures} request(s) failed");
        std::process::exit(1);
    }

    Ok(())
}
