use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "admission-cli")]
#[command(about = "Management CLI for the stream admission service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show active count and configured limit
    Status,
    /// List tracked streams
    Streams,
    /// Reserve a persistent stream slot
    Reserve { client: String, stream: String },
    /// Register or refresh a polled stream
    Heartbeat { client: String, stream: String },
    /// Release a persistent stream slot
    Release { client: String, stream: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match &cli.command {
        Commands::Status => client.get(format!("{base}/v1/status")).send().await?,
        Commands::Streams => client.get(format!("{base}/v1/streams")).send().await?,
        Commands::Reserve { client: ip, stream } => {
            client
                .post(format!("{base}/v1/streams/{ip}/{stream}"))
                .send()
                .await?
        }
        Commands::Heartbeat { client: ip, stream } => {
            client
                .post(format!("{base}/v1/streams/{ip}/{stream}/heartbeat"))
                .send()
                .await?
        }
        Commands::Release { client: ip, stream } => {
            client
                .delete(format!("{base}/v1/streams/{ip}/{stream}"))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: control API returned status {}", status);
    }
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
