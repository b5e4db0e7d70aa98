use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "urlsum",
    about = "Summarize a YouTube video or web page",
    version
)]
pub struct Cli {
    /// YouTube or website URL (reads one URL per line from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Preferred transcript language, highest priority first (repeatable)
    #[arg(short, long = "lang")]
    pub langs: Vec<String>,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Print the prompt sent to the model
    #[arg(long)]
    pub show_prompt: bool,

    /// Show request state and settings
    #[arg(short, long)]
    pub verbose: bool,
}
