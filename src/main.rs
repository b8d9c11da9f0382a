use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use cf_standings::config::AppConfig;
use cf_standings::pipeline::Pipeline;
use cf_standings::scraper::http_client::HttpClient;
use cf_standings::scraper::{FileFetcher, standings_url};
use cf_standings::{server, utils};

#[derive(Parser)]
#[command(name = "cf-standings", about = "Accepted problems per contestant from group standings", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Serve standings summaries over HTTP
    Serve {
        /// Listen port (overrides config)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Fetch one standings page and print the summary
    Fetch {
        #[arg(short, long, required_unless_present = "url")]
        group: Option<String>,

        #[arg(short, long, required_unless_present = "url")]
        contest: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Restrict standings to a saved participant list
        #[arg(short, long)]
        list: Option<String>,

        /// Full standings URL instead of group/contest/page
        #[arg(long, conflicts_with_all = ["group", "contest", "list"])]
        url: Option<String>,
    },

    /// Summarise a saved standings page
    Parse {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "cf_standings=info,actix_web=info,warn",
        1 => "cf_standings=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Serve { port } => {
            let pipeline = Pipeline::new(Arc::new(HttpClient::new(&config.scraper)?), config.base_url());
            let port = port.unwrap_or(config.server.port);
            let address = format!("{}:{}", config.server.host, port);
            let listener =
                TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;

            info!("Server is listening on {}", address);
            server::run(listener, pipeline, config.server.static_dir.clone())?.await?;
        }

        Command::Fetch { group, contest, page, list, url } => {
            let url = match url {
                Some(url) => url,
                None => standings_url(
                    config.base_url(),
                    group.as_deref().unwrap_or_default(),
                    contest.as_deref().unwrap_or_default(),
                    &page.to_string(),
                    list.as_deref(),
                )?,
            };
            let pipeline = Pipeline::new(Arc::new(HttpClient::new(&config.scraper)?), config.base_url());
            let resp = pipeline.run(&url).await;
            println!("{}", utils::to_pretty_json(&resp)?);
        }

        Command::Parse { file } => {
            let source = file.display().to_string();
            let pipeline = Pipeline::new(Arc::new(FileFetcher::new(file)), config.base_url());
            let resp = pipeline.run(&source).await;
            println!("{}", utils::to_pretty_json(&resp)?);
        }
    }

    Ok(())
}
