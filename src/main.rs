use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, WrapErr, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, Command, OutputFormat};
use ytseo::VideoReference;
use ytseo::analyzer::Analyzer;
use ytseo::completion::{CompletionService, OpenAiClient};
use ytseo::config::Config;
use ytseo::server::AppState;
use ytseo::youtube::{CaptionService, VideoSearch, YouTubeClient};

/// Append to the ytseo log file; `--verbose` lowers the default filter to debug
fn init_file_logger(verbose: bool) -> Result<PathBuf> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).wrap_err_with(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    let default_filter = if verbose { "ytseo=debug" } else { "ytseo=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(path)
}

fn log_file_path() -> PathBuf {
    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("ytseo").join("ytseo.log")
}

fn status_mark(ok: bool) -> &'static str {
    if ok { "\x1b[32m✅\x1b[0m" } else { "\x1b[31m❌\x1b[0m" }
}

fn build_after_help() -> String {
    let youtube = std::env::var("YOUTUBE_API_KEY").is_ok();
    let openai = std::env::var("OPENAI_API_KEY").is_ok();
    let log_path = log_file_path();

    format!(
        "\nCREDENTIALS:\n  {} YOUTUBE_API_KEY  (search and captions)\n  {} OPENAI_API_KEY   (structure analysis)\n\n\
         Config: {}\nLogs are written to: {}",
        status_mark(youtube),
        status_mark(openai),
        ytseo::config::config_path().display(),
        log_path.display()
    )
}

/// Service handles shared by every request, built once
struct Services {
    youtube: Option<Arc<YouTubeClient>>,
    analyzer: Analyzer,
}

impl Services {
    fn from_env(config: &Config) -> Self {
        let client = reqwest::Client::new();

        let youtube = YouTubeClient::from_env(client.clone()).map(Arc::new);
        if youtube.is_none() {
            warn!("YOUTUBE_API_KEY not set: search and captions disabled");
        }

        let completion = OpenAiClient::from_env(client).map(|c| Arc::new(c) as Arc<dyn CompletionService>);
        if completion.is_none() {
            warn!("OPENAI_API_KEY not set: structure analysis disabled");
        }

        let captions = youtube.clone().map(|y| y as Arc<dyn CaptionService>);
        let mut analyzer = Analyzer::new(captions, completion);
        if let Some(ref model) = config.model {
            analyzer = analyzer.with_model(model);
        }

        Self { youtube, analyzer }
    }

    fn search(&self) -> Option<Arc<dyn VideoSearch>> {
        self.youtube.clone().map(|y| y as Arc<dyn VideoSearch>)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let log_path = init_file_logger(cli.verbose)?;
    info!("ytseo {} logging to {}", env!("GIT_DESCRIBE"), log_path.display());

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring invalid config: {e}");
        Config::default()
    });

    let services = Services::from_env(&config);

    if cli.verbose {
        let config_path = ytseo::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "YouTube API: {}\nOpenAI: {}",
            status_mark(services.analyzer.captions_configured()),
            status_mark(services.analyzer.completion_configured())
        );
        if let Some(ref model) = config.model {
            debug!("Config model: {model}");
        }
    }

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            let host = host.as_deref().unwrap_or(config.host());
            let ip: IpAddr = host.parse().wrap_err_with(|| format!("invalid host: {host}"))?;
            let addr = SocketAddr::new(ip, port.unwrap_or_else(|| config.port()));

            let state = AppState {
                search: services.search(),
                analyzer: Arc::new(services.analyzer),
                max_results: config.max_results(),
            };
            ytseo::server::serve(state, addr).await?;
        }
        Command::Analyze { url, title, format } => {
            let Some(video_id) = ytseo::parse_video_input(&url) else {
                bail!(
                    "could not extract video ID from: {url}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/v/ID\n  <11-character video ID>"
                );
            };
            let video = VideoReference { video_id, title };

            let result = services.analyzer.analyze(&video.video_id, &video.title).await;
            let rendered = match format {
                OutputFormat::Text => ytseo::output::render_text(&result),
                OutputFormat::Json => ytseo::output::render_json(&result)?,
            };
            println!("{rendered}");

            result.check()?;
        }
        Command::Report { keyword } => {
            let search = services.search();
            let report = ytseo::server::build_report(search.as_deref(), &keyword, config.max_results()).await?;
            println!("{}", ytseo::output::render_report(&report));
        }
    }

    Ok(())
}
