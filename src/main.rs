use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};
use vi_g2p::{
    config::G2pConfig,
    constants::DEFAULT_LISTEN,
    inference::{Frontend, FrontendInput},
    server::serve,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON G2P config (tokenizer, lexicon, fallback policy)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print phones, tones and word2ph for one utterance as JSON
    G2p {
        /// Input text
        #[arg(long)]
        text: String,

        /// Treat the input as already normalized
        #[arg(long = "no-normalize")]
        no_normalize: bool,
    },
    /// Serve the G2P HTTP API
    Serve {
        /// Address to bind the HTTP server to
        #[arg(long, default_value = DEFAULT_LISTEN)]
        listen: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => G2pConfig::load_from_file(path)?,
        None => G2pConfig::default(),
    };
    let frontend = Frontend::from_config(&config).context("failed to initialise G2P front end")?;

    match args.command {
        Command::G2p { text, no_normalize } => {
            let mut input = FrontendInput::new(text);
            input.normalize = !no_normalize;
            let result = frontend.process(&input)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Serve { listen } => {
            let listen: SocketAddr = listen.parse().context("invalid listen address")?;

            let runtime = Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to build tokio runtime")?;

            runtime
                .block_on(async { serve(listen, frontend).await })
                .context("server terminated unexpectedly")
        }
    }
}
