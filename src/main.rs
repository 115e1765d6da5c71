use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use senechal_mcp::config::{load_config, Config};
use senechal_mcp::mcp::{prompt_named, resource_entries, McpServer, PROMPTS};
use senechal_mcp::routing::{resolve_resource, resolve_tool, RESOURCE_SCHEME, ROUTES};
use senechal_mcp::upstream::HttpUpstream;
use senechal_mcp::{HealthService, UpstreamResult};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Senechal MCP - Expose the Senechal health API to MCP clients
#[derive(Parser, Debug)]
#[command(name = "senechal-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expose the Senechal health API to MCP clients", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default)
    Serve {
        /// Run in streamable HTTP mode instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Read a resource, e.g. senechal://health/summary/day?span=7
    Read {
        /// Resource URI
        uri: String,
    },

    /// Call a tool with key=value arguments
    Call {
        /// Tool name, e.g. fetch_health_trends
        tool: String,

        /// Tool argument (repeatable)
        #[arg(long = "arg", short = 'a', value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },

    /// Show the upstream request a URI or tool call resolves to, without sending it
    Resolve {
        /// Resource URI or tool name
        target: String,

        /// Tool argument (repeatable, ignored for URIs)
        #[arg(long = "arg", short = 'a', value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },

    /// List resources, tools and prompts
    List,

    /// Print a prompt template
    Prompt {
        /// Prompt name
        name: String,
    },

    /// Print the effective configuration (credential masked)
    Config,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn arguments(args: Vec<(String, String)>) -> Value {
    let map: Map<String, Value> = args
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    Value::Object(map)
}

fn print_env_vars() {
    println!("Senechal MCP - Environment Variables");
    println!();
    println!("Required:");
    println!("  SENECHAL_API_BASE_URL          Base URL of the Senechal API");
    println!("  SENECHAL_API_KEY               API key sent as the X-API-Key header");
    println!();
    println!("Optional:");
    println!("  SENECHAL_TIMEOUT_SECS          Request timeout in seconds (default: 30)");
    println!("  SENECHAL_CONNECT_TIMEOUT_SECS  Connect timeout in seconds (default: 10)");
    println!("  SENECHAL_USER_AGENT            User agent for upstream requests");
    println!("  RUST_LOG                       Log filter (overrides -v/-q)");
    std::process::exit(0);
}

fn init_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("senechal_mcp={}", level)),
    );

    // stdout belongs to the stdio transport
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_service(config: &Config) -> Result<HealthService> {
    let upstream_config = config.validate()?;
    tracing::info!("Using API URL: {}", upstream_config.base_url);
    tracing::info!(
        "API Key: {}",
        senechal_mcp::config::mask(&upstream_config.api_key)
    );

    let upstream =
        HttpUpstream::new(&upstream_config).context("Failed to create HTTP client")?;
    Ok(HealthService::new(Arc::new(upstream)))
}

/// Cancellation token tripped by Ctrl-C
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

fn print_result(result: &UpstreamResult) {
    println!("{}", result.to_text());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    init_tracing(&cli);

    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve {
        http: false,
        port: 3000,
        host: "127.0.0.1".to_string(),
    }) {
        Commands::Serve { http, port, host } => {
            tracing::info!("Starting Senechal Health MCP Server");
            let server = McpServer::new(build_service(&config)?)?;

            if http {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Commands::Read { uri } => {
            let service = build_service(&config)?;
            let result = service.read_resource(&uri, &ctrl_c_token()).await?;
            print_result(&result);
        }

        Commands::Call { tool, args } => {
            let service = build_service(&config)?;
            let result = service
                .call_tool(&tool, &arguments(args), &ctrl_c_token())
                .await?;
            print_result(&result);
        }

        Commands::Resolve { target, args } => {
            let resolved = if target.starts_with(&format!("{}://", RESOURCE_SCHEME)) {
                resolve_resource(&target)?
            } else {
                resolve_tool(&target, &arguments(args))?
            };
            println!("{}", serde_json::to_string_pretty(&resolved)?);
            println!("GET /{}?{}", resolved.request.path, resolved.request.query_string());
        }

        Commands::List => {
            println!("Resources:");
            for entry in resource_entries() {
                println!("  {:<42} {} [{}]", entry.uri, entry.name, entry.mime_type);
            }
            println!();
            println!("Tools:");
            for route in ROUTES {
                println!("  {:<42} {}", route.tool, route.description);
            }
            println!();
            println!("Prompts:");
            for prompt in PROMPTS {
                println!("  {:<42} {}", prompt.name, prompt.description);
            }
        }

        Commands::Prompt { name } => {
            let prompt = prompt_named(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown prompt: {}", name))?;
            println!("{}", prompt.body);
        }

        Commands::Config => {
            print!("{}", config.to_masked_toml()?);
            match config.validate() {
                Ok(_) => println!("# configuration is valid"),
                Err(e) => println!("# configuration is invalid: {}", e),
            }
        }
    }

    Ok(())
}
