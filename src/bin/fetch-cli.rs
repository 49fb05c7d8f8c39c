use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use resilient_fetch::config::{load_config, FetcherConfig};
use resilient_fetch::fetch::{FetchError, RequestSpec};
use resilient_fetch::lifecycle::{signals, TeardownScope};
use resilient_fetch::observability::{logging, metrics};
use resilient_fetch::wallet::{WalletClient, WalletError};

#[derive(Parser)]
#[command(name = "fetch-cli")]
#[command(about = "Issue wallet API requests with endpoint fallback", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bearer token sent with every request.
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path from the first healthy endpoint
    Get { path: String },
    /// POST a JSON body to a path
    Post {
        path: String,
        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        body: String,
    },
    /// Show the wallet balance
    Balance,
    /// List recent transactions
    Transactions,
    /// Show the funding virtual account for a gateway
    VirtualAccount {
        #[arg(short, long)]
        gateway: String,
        /// Ignore any cached account details
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FetcherConfig::default(),
    };
    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let mut client = WalletClient::from_config(&config)?;
    if let Some(token) = cli.token {
        client = client.with_auth_token(token);
    }

    let scope = TeardownScope::new();
    let cancel = scope.token();
    tokio::spawn(signals::cancel_on_ctrl_c(cancel.clone()));

    let result: Result<Value, WalletError> = match cli.command {
        Commands::Get { path } => match RequestSpec::get(path, client.timeout_ms()) {
            Ok(spec) => raw_request(&client, spec, &cancel).await,
            Err(e) => Err(e.into()),
        },
        Commands::Post { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            match RequestSpec::post_json(path, &body, client.timeout_ms()) {
                Ok(spec) => raw_request(&client, spec, &cancel).await,
                Err(e) => Err(e.into()),
            }
        }
        Commands::Balance => client
            .balance(&cancel)
            .await
            .and_then(to_json),
        Commands::Transactions => client.transactions(&cancel).await.map(Value::Array),
        Commands::VirtualAccount { gateway, refresh } => client
            .virtual_account(&gateway, refresh, &cancel)
            .await
            .and_then(to_json),
    };
    scope.trigger();

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(WalletError::Fetch(FetchError::Cancelled)) => {
            eprintln!("Cancelled");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn raw_request(
    client: &WalletClient,
    spec: RequestSpec,
    cancel: &tokio_util::sync::CancellationToken,
) -> Result<Value, WalletError> {
    let payload = client
        .fetcher()
        .request(&spec, client.candidates(), client.auth_token(), cancel)
        .await
        .into_result()?;
    Ok(payload)
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, WalletError> {
    serde_json::to_value(value).map_err(|e| FetchError::from(e).into())
}
