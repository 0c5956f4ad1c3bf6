use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jtl")]
#[command(about = "Translate every string in a JSON document into multiple languages")]
#[command(version)]
pub struct Args {
    /// JSON file to translate (reads from stdin if not provided)
    pub file: Option<String>,

    /// Target language codes, comma-separated (e.g., fr,es,de)
    #[arg(short = 't', long = "to", value_delimiter = ',')]
    pub to: Vec<String>,

    /// Output directory for translated files
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Google Translate API key
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// OAuth access token (e.g., from `gcloud auth print-access-token`)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Translation API endpoint URL
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Number of strings sent per request (1-128)
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Save translations without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Suppress progress and status output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported target language codes
    Languages,
    /// Configure default target languages, output directory and credentials
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
