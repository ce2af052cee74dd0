//! CLI argument parsing.
//!
//! Thin on purpose: arguments are resolved into a config in `config.rs` and
//! handed to the pipeline unchanged.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "capgen",
    version,
    about = "Upload an image and generate captions through the REST pipeline",
    after_help = "Examples:\n  capgen run --image photo.png\n  capgen run --image photo.jpg --json --out result.json\n  CAPGEN_ACCESS_TOKEN=... capgen run --image photo.heic --verbose\n  capgen types",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Run(RunArgs),
    Types(TypesArgs),
}

/// Run command inputs for one image.
#[derive(Parser, Debug)]
#[command(about = "Upload an image and generate captions for it")]
pub struct RunArgs {
    /// Image file to upload
    #[arg(long, value_name = "PATH")]
    pub image: PathBuf,

    /// Content type to declare (default: guessed from the file extension)
    #[arg(long, value_name = "MIME")]
    pub content_type: Option<String>,

    /// Bearer access token (default: $CAPGEN_ACCESS_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// API origin for the JSON endpoints (default: $CAPGEN_API_BASE_URL or the hosted API)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Emit the result as JSON on stdout and progress as JSON lines on stderr
    #[arg(long)]
    pub json: bool,

    /// Also write the result JSON to this path
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Log step timings and HTTP status codes
    #[arg(long)]
    pub verbose: bool,
}

/// Types command inputs (none).
#[derive(Parser, Debug)]
#[command(about = "List the image content types the service accepts")]
pub struct TypesArgs {}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Run(args) => args.verbose,
            Command::Types(_) => false,
        }
    }
}
