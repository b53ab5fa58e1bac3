use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "botbooker-cli")]
#[command(about = "Probe a running botbooker API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Send a `traceparent` header to join an existing trace.
    #[arg(short, long)]
    traceparent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness check
    Ping,
    /// Health snapshot; exits non-zero unless healthy
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let path = match cli.command {
        Commands::Ping => "/ping",
        Commands::Health => "/health",
    };

    let mut request = client.get(format!("{}{}", cli.url, path));
    if let Some(traceparent) = &cli.traceparent {
        request = request.header("traceparent", traceparent);
    }
    let res = request.send().await?;

    if let Some(id) = res.headers().get("x-request-id").and_then(|v| v.to_str().ok()) {
        eprintln!("x-request-id: {}", id);
    }

    let json = print_response(res).await?;

    if matches!(cli.command, Commands::Health) {
        let status = json.as_ref().and_then(|j| j["status"].as_str()).unwrap_or("unknown");
        if status != "healthy" {
            eprintln!("Service is {}", status);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(Some(json))
}
