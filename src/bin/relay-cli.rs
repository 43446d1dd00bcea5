use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Exercise a running embedding relay from the command line", long_about = None)]
struct Cli {
    /// Base URL of the running relay.
    #[arg(short, long, default_value = "http://localhost:8080")]
    relay: String,

    /// Relay route to call.
    #[arg(long, default_value = "/api/fetch-site")]
    route: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page through the relay and print the (rewritten) body
    Fetch {
        /// Absolute URL of the page to relay
        target: String,
    },
    /// Show the status and headers the relay emits for a page
    Headers {
        /// Absolute URL of the page to relay
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match &cli.command {
        Commands::Fetch { target } => {
            let res = client.get(endpoint(&cli, target)).send().await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Relay returned status {}", status);
            }
            println!("{}", res.text().await?);
        }
        Commands::Headers { target } => {
            let res = client.get(endpoint(&cli, target)).send().await?;
            println!("{}", res.status());
            for (name, value) in res.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
        }
    }

    Ok(())
}

fn endpoint(cli: &Cli, target: &str) -> String {
    format!(
        "{}{}?url={}",
        cli.relay.trim_end_matches('/'),
        cli.route,
        urlencoding::encode(target)
    )
}
