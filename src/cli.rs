use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytseo",
    about = "YouTube keyword reports and video structure analysis",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Show configuration and service status
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web application (default)
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT and config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze the narrative structure of one video
    Analyze {
        /// YouTube video URL or 11-character video ID
        url: String,

        /// Video title to include in the prompt
        #[arg(short, long, default_value = "")]
        title: String,

        /// Output format: text (default), json
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the aggregate report for a search keyword
    Report {
        keyword: String,
    },
}
