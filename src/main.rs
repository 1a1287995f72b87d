use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use feedkit::{decode_feed_with, encode_feed, write_feed_file, Config};

/// Get the default config file path (~/.config/feedkit/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedkit")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedkit",
    about = "Decode an RSS, RDF or Atom feed and re-emit it as canonical RSS 2.0"
)]
struct Args {
    /// Feed document to read
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the RSS 2.0 output to FILE (atomically) instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the decoded feed as JSON instead of RSS
    #[arg(long)]
    json: bool,

    /// Log diagnostics while decoding
    #[arg(short, long)]
    verbose: bool,

    /// Suppress diagnostics, overriding --verbose and the config file
    #[arg(short, long)]
    quiet: bool,

    /// Config file [default: ~/.config/feedkit/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "feedkit=info" } else { "feedkit=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(ref path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;
    config.verbose = (config.verbose || args.verbose) && !args.quiet;

    init_tracing(config.verbose);

    let bytes = std::fs::read(&args.input).with_context(|| {
        format!(
            "Failed to read '{}': check the path and file permissions",
            args.input.display()
        )
    })?;

    let feed = decode_feed_with(&bytes, &config)
        .with_context(|| format!("Failed to decode feed '{}'", args.input.display()))?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&feed).context("Failed to serialize feed as JSON")?;
        println!("{}", json);
        return Ok(());
    }

    match args.output {
        Some(ref path) => write_feed_file(&feed, path, &config)
            .with_context(|| format!("Failed to write feed to '{}'", path.display()))?,
        None => {
            let xml = encode_feed(&feed).context("Failed to encode feed")?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&xml).context("Failed to write to stdout")?;
            writeln!(stdout).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
