use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::StatusCode;

use emojify_api::backend::CacheKey;
use emojify_api::http::validation::SubmittedUrl;

#[derive(Parser)]
#[command(name = "emojify-cli")]
#[command(about = "Command-line client for the emojify API", long_about = None)]
struct Cli {
    /// Base URL of the gateway, including its mount path
    #[arg(short, long, default_value = "http://localhost:9090/")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an image URL for emojification
    Submit { image_url: String },
    /// Fetch the result of a submitted job
    Fetch {
        id: String,
        /// Write the image to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch a previously emojified image from the cache
    Cache {
        key: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check gateway and backend health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = if cli.url.ends_with('/') {
        cli.url.clone()
    } else {
        format!("{}/", cli.url)
    };

    match cli.command {
        Commands::Submit { image_url } => {
            let res = client.post(&base).body(image_url.clone()).send().await?;
            if res.status() == StatusCode::NOT_MODIFIED {
                println!("Already emojified.");
                if let Ok(url) = SubmittedUrl::parse(&image_url) {
                    println!("{}cache/{}", base, CacheKey::for_url(&url));
                }
                return Ok(());
            }
            print_text(res).await?;
        }
        Commands::Fetch { id, output } => {
            let res = client.get(format!("{}{}", base, id)).send().await?;
            save_or_print(res, output).await?;
        }
        Commands::Cache { key, output } => {
            let res = client.get(format!("{}cache/{}", base, key)).send().await?;
            save_or_print(res, output).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}health", base)).send().await?;
            print_text(res).await?;
        }
    }

    Ok(())
}

async fn print_text(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        println!("{}", status);
        print!("{}", body);
    } else {
        eprintln!("Error: gateway returned status {}", status);
        eprint!("{}", body);
    }
    Ok(())
}

async fn save_or_print(
    res: reqwest::Response,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status != StatusCode::OK {
        return print_text(res).await;
    }

    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = res.bytes().await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &bytes).await?;
            println!("Wrote {} bytes ({}) to {}", bytes.len(), content_type, path.display());
        }
        None => println!("{} bytes ({}); pass -o to save", bytes.len(), content_type),
    }
    Ok(())
}
