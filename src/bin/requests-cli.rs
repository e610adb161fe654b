use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "requests-cli")]
#[command(about = "Command-line client for the item request API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List requests, newest first
    List {
        #[arg(short, long)]
        page: Option<u64>,
        /// pending, approved, completed or rejected
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Submit a new request
    Create {
        #[arg(long)]
        requestor: String,
        #[arg(long)]
        item: String,
    },
    /// Change the status of a request
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/request", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List { page, status } => {
            let mut query = Vec::new();
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(status) = status {
                query.push(("status", status));
            }
            client.get(&endpoint).query(&query).send().await?
        }
        Commands::Create { requestor, item } => {
            client
                .put(&endpoint)
                .json(&json!({ "requestorName": requestor, "itemRequested": item }))
                .send()
                .await?
        }
        Commands::Update { id, status } => {
            client
                .patch(&endpoint)
                .json(&json!({ "id": id, "status": status }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
