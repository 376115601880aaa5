//! `ccdrop`: command-line entry point.
//!
//! Startup sequence:
//! 1. Parse arguments and load [`Config`] from `CCDROP_*` environment variables.
//! 2. Initialise stderr logging.
//! 3. Run `send` or `get` through a [`SharePipeline`] backed by [`HttpTransfer`].

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use ccdrop::config::Config;
use ccdrop::ops::{self, DEFAULT_OUTPUT};
use ccdrop::{HttpTransfer, ShareError, ShareLink, SharePipeline};

#[derive(Parser, Debug)]
#[command(name = "ccdrop", version, about = "End-to-end encrypted file drop")]
#[command(after_help = "Example usage:
    ccdrop -p file.txt send
    ccdrop -i ABC123 -k <key> -u https://drop.example get
    ccdrop get --link 'https://drop.example/ABC123#<key>'")]
struct Args {
    /// Share identifier (get)
    #[arg(short, long, global = true)]
    id: Option<String>,

    /// Base64url share key (get)
    #[arg(short, long, global = true, allow_hyphen_values = true)]
    key: Option<String>,

    /// File to share (send)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Relay origin; overrides CCDROP_SERVER_URL
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Log pipeline steps to stderr
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a file, upload it, and print its share link
    Send,
    /// Download and decrypt a share
    Get {
        /// Full share link or pasted command, instead of -i/-k/-u
        #[arg(long)]
        link: Option<String>,

        /// Where to write the decrypted file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = ccdrop::telemetry::init(&cfg.log_level, args.verbose) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args, cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ShareError>() {
                Some(share) => eprintln!("{}", share.user_message()),
                None => eprintln!("ERROR: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, cfg: Config) -> Result<()> {
    let origin = args.url.unwrap_or_else(|| cfg.server_url.clone());

    match args.command {
        Command::Send => {
            let path = args.path.context("send requires -p <path>")?;
            let transfer = HttpTransfer::new(&origin, cfg.request_timeout())?;
            let mut pipeline = SharePipeline::new(transfer, origin.as_str());

            let link = ops::send_file(&mut pipeline, &path).await?;
            println!("{}", link.to_command());
            println!("Open {}", link.to_url());
        }
        Command::Get { link, output } => {
            let link = match link {
                Some(_) if args.id.is_some() || args.key.is_some() => {
                    anyhow::bail!("--link cannot be combined with -i or -k");
                }
                Some(input) => ShareLink::parse(&input)?,
                None => {
                    let id = args.id.context("get requires -i <id> or --link")?;
                    let key = args.key.context("get requires -k <key> or --link")?;
                    ShareLink::from_parts(&origin, &id, &key)?
                }
            };

            let transfer = HttpTransfer::new(link.origin(), cfg.request_timeout())?;
            let mut pipeline = SharePipeline::new(transfer, link.origin());

            let written = ops::receive_file(&mut pipeline, &link, &output).await?;
            println!("Written {written} bytes to: {}", output.display());
        }
    }

    Ok(())
}
