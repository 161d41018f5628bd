// Relay CLI - Command Line Interface Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use relay_config::Config;
use relay_core::client::{PlaceholderHandler, SamplingHandler, ToolClient};
use relay_core::model::{ChatClient, ModelSamplingHandler};
use relay_core::pipeline::{PipelineCoordinator, PipelineOutcome, ToolCaller};
use relay_core::server::ToolServer;
use relay_core::tools::build_default_tools;
use relay_protocol::ToolResult;

/// Relay - tool server that delegates model sampling to the calling client
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Configuration file path
  #[arg(short = 'c', long = "config")]
  config: Option<PathBuf>,

  #[clap(subcommand)]
  command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
  /// Start the tool server
  Serve {
    /// Bind host
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(long)]
    port: Option<u16>,
  },

  /// Analyze the sentiment of a text through the server
  Analyze {
    /// Text to classify
    text: String,

    /// Server address
    #[arg(long)]
    addr: Option<String>,

    /// Answer sample requests with the placeholder handler instead of a model
    #[arg(long)]
    placeholder: bool,
  },

  /// Run the three-stage analysis pipeline
  Pipeline {
    /// Maximum posts to collect
    #[arg(long, default_value_t = 5)]
    limit: usize,

    /// Server address
    #[arg(long)]
    addr: Option<String>,

    /// Answer sample requests with the placeholder handler instead of a model
    #[arg(long)]
    placeholder: bool,
  },

  /// List the registered tools
  Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let cli = Cli::parse();
  let config = Config::load(cli.config.as_deref())?;

  match cli.command {
    Commands::Serve { host, port } => serve(config, host, port).await,
    Commands::Analyze {
      text,
      addr,
      placeholder,
    } => analyze(config, text, addr, placeholder).await,
    Commands::Pipeline {
      limit,
      addr,
      placeholder,
    } => pipeline(config, limit, addr, placeholder).await,
    Commands::Tools => {
      list_tools();
      Ok(())
    }
  }
}

async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
  let host = host.unwrap_or_else(|| config.server.host.clone());
  let port = port.unwrap_or(config.server.port);

  let (_registry, gateway) = build_default_tools();
  let server = Arc::new(ToolServer::new(gateway, &config));

  let listener = TcpListener::bind((host.as_str(), port)).await?;
  info!(%host, port, "starting {}", config.server.name);
  server.serve(listener).await?;
  Ok(())
}

fn build_handler(config: &Config, placeholder: bool) -> Result<Arc<dyn SamplingHandler>> {
  if placeholder {
    return Ok(Arc::new(PlaceholderHandler));
  }
  let chat = ChatClient::from_config(&config.model)?;
  Ok(Arc::new(ModelSamplingHandler::new(chat)))
}

async fn analyze(
  config: Config,
  text: String,
  addr: Option<String>,
  placeholder: bool,
) -> Result<()> {
  let addr = addr.unwrap_or_else(|| config.server.addr());
  let handler = build_handler(&config, placeholder)?;

  let client = ToolClient::connect(&addr, handler).await?;
  let result = client
    .call_tool("analyze_sentiment", serde_json::json!({ "text": text }))
    .await?;

  match result {
    ToolResult::Success { payload } => {
      println!("{}", serde_json::to_string_pretty(&payload)?);
      Ok(())
    }
    ToolResult::Error { error } => {
      anyhow::bail!("tool call failed ({:?}): {}", error.kind, error.message)
    }
  }
}

async fn pipeline(
  config: Config,
  limit: usize,
  addr: Option<String>,
  placeholder: bool,
) -> Result<()> {
  let addr = addr.unwrap_or_else(|| config.server.addr());
  let handler = build_handler(&config, placeholder)?;

  let client = Arc::new(ToolClient::connect(&addr, handler).await?);
  let coordinator = PipelineCoordinator::new(client as Arc<dyn ToolCaller>);

  match coordinator.run(limit).await {
    PipelineOutcome::Completed { report, .. } => {
      let text = report
        .data
        .as_ref()
        .and_then(|data| data.get("report"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
      println!("{text}");
      Ok(())
    }
    PipelineOutcome::Failed { stage, detail } => {
      anyhow::bail!(
        "pipeline failed at {stage}: {}",
        detail.error.unwrap_or_else(|| "unknown error".to_string())
      )
    }
  }
}

fn list_tools() {
  let (registry, _gateway) = build_default_tools();
  let mut specs = registry.list_specs();
  specs.sort_by(|a, b| a.name.cmp(&b.name));

  for spec in specs {
    println!("{:<20} {:<10} {}", spec.name, spec.category, spec.description);
  }
}
