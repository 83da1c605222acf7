use clap::{Parser, Subcommand};
use reqwest::header::HeaderValue;
use serde_json::Value;

use corrlog::admin::LEVEL_ROUTE;
use corrlog::http::X_CORRELATION_ID;
use corrlog::logger::new_correlation_id;
use corrlog::Level;

#[derive(Parser)]
#[command(name = "loglevel")]
#[command(about = "Inspect or change the log level of a running process", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:53835")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current level
    Get,
    /// Change the level (debug, info, warn, error, dpanic, panic, fatal)
    Set { level: Level },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}{}", cli.url.trim_end_matches('/'), LEVEL_ROUTE);

    let res = match cli.command {
        Commands::Get => client.get(&endpoint).send().await?,
        Commands::Set { level } => {
            client
                .put(&endpoint)
                .header(X_CORRELATION_ID, HeaderValue::from_str(&new_correlation_id())?)
                .json(&serde_json::json!({ "level": level }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: level endpoint returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
