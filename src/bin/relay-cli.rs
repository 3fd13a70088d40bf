use clap::{Parser, Subcommand};
use reqwest::{Method, Response};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command line client for a running heartbeat-relay", long_about = None)]
struct Cli {
    /// Base URL of the relay.
    #[arg(short, long, env = "RELAY_URL", default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Heartbeat, recent errors and intake status
    Status,
    /// Current heartbeat only
    Heartbeat,
    /// Liveness probe
    Health,
    /// Record a manual error
    TriggerError {
        /// Number of errors to trigger
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Emit the sample application log sequence
    TestLogs,
}

impl Commands {
    fn request(&self) -> (Method, &'static str) {
        match self {
            Commands::Status => (Method::GET, "/api/status"),
            Commands::Heartbeat => (Method::GET, "/heartbeat"),
            Commands::Health => (Method::GET, "/health"),
            Commands::TriggerError { .. } => (Method::POST, "/api/trigger-error"),
            Commands::TestLogs => (Method::POST, "/api/test-app-logs"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let repeat = match cli.command {
        Commands::TriggerError { count } => count.max(1),
        _ => 1,
    };
    let (method, path) = cli.command.request();

    for _ in 0..repeat {
        let res = client
            .request(method.clone(), format!("{}{}", base, path))
            .send()
            .await?;
        print_response(res).await?;
    }

    Ok(())
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
