use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod captions;
mod cli;
mod config;
mod media;
mod output;
mod pipeline;
mod progress;

use cli::{Command, RootArgs, RunArgs};
use config::{resolve_config, resolve_token};
use pipeline::{run_caption_pipeline, PipelineRequest, UreqTransport};
use progress::{ProgressStyle, StepBoard};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.command.verbose());

    match args.command {
        Command::Run(args) => cmd_run(args),
        Command::Types(_) => cmd_types(),
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "capgen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let env = |key: &str| std::env::var(key).ok();
    let config = resolve_config(args.base_url.as_deref(), args.timeout_secs, env)?;
    let token = resolve_token(args.token.as_deref(), env);
    let content_type = media::resolve_content_type(&args.image, args.content_type.as_deref())?;
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("read image {}", args.image.display()))?;
    if bytes.is_empty() {
        return Err(anyhow!("image {} is empty", args.image.display()));
    }
    tracing::info!(
        image = %args.image.display(),
        %content_type,
        bytes = bytes.len(),
        base_url = %config.base_url,
        "starting caption pipeline"
    );

    let transport = UreqTransport::new(config.timeout);
    let style = if args.json {
        ProgressStyle::JsonLines
    } else {
        ProgressStyle::Human
    };
    let mut board = StepBoard::new(style);
    let request = PipelineRequest {
        base_url: &config.base_url,
        token: &token,
        content_type: &content_type,
        bytes: &bytes,
    };
    let result = run_caption_pipeline(&transport, &request, Some(&mut board)).map_err(|err| {
        let context = format!("step {} ({}) failed", err.step.number(), err.step.label());
        anyhow::Error::new(err).context(context)
    })?;

    if let Some(out) = &args.out {
        output::write_json(out, &result)?;
        eprintln!("Wrote result to {}", out.display());
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", output::render_result(&result));
    }
    Ok(())
}

fn cmd_types() -> Result<()> {
    for content_type in media::SUPPORTED_CONTENT_TYPES {
        println!("{content_type}");
    }
    Ok(())
}
