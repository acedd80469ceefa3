// src/main.rs

use std::env;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wormholescan_agent::{
    agent::{OpenAiClient, ScanAgent, ToolBox},
    api,
    blockchain::{services::swagger, ChainRegistry, WormholeScanClient},
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState, config: &Config) {
    let app = api::router(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("❌ Failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };
    info!("🚀 HTTP Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }
    info!("HTTP server shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

// --- JSON-RPC Server Logic ---
async fn run_mcp_server(state: AppState) {
    info!("🚀 Starting JSON-RPC tool server on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, shutting down JSON-RPC server");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);

                let response = match serde_json::from_str::<Request>(line) {
                    Ok(request) => handle_mcp_request(request, state.clone()).await,
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(Response::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        debug!(is_error = response.is_error(), "Sending: {}", response_json);
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("Failed to write response: {}", e);
                            break;
                        }
                        if let Err(e) = stdout.flush().await {
                            error!("Failed to flush response: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("JSON-RPC server shutting down");
}

async fn log_api_summary(client: &WormholeScanClient) {
    match swagger::fetch_api_summary(client).await {
        Ok(summary) => info!(
            title = summary.title.as_deref().unwrap_or("unknown"),
            version = summary.version.as_deref().unwrap_or("unknown"),
            paths = summary.path_count,
            "WormholeScan API description loaded"
        ),
        Err(e) => warn!(
            error = %e,
            status_code = ?e.status_code,
            "Could not load WormholeScan API description"
        ),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing. Logs go to stderr so stdout stays free for JSON-RPC mode.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wormholescan_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    let registry = match ChainRegistry::wormhole() {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!("❌ Invalid chain registry: {}", e);
            process::exit(1);
        }
    };
    info!(chains = registry.len(), "Chain registry loaded");

    let scan_client =
        match WormholeScanClient::new(&config.wormholescan_api_url, config.upstream_timeout) {
            Ok(client) => client,
            Err(e) => {
                error!("❌ Failed to initialize WormholeScan client: {:#}", e);
                process::exit(1);
            }
        };

    if config.swagger_prefetch {
        log_api_summary(&scan_client).await;
    }

    let llm = match OpenAiClient::new(
        config.openai_api_key.clone(),
        &config.openai_model,
        &config.openai_base_url,
        config.llm_temperature,
        config.llm_timeout,
    ) {
        Ok(llm) => llm,
        Err(e) => {
            error!("❌ Failed to initialize LLM client: {:#}", e);
            process::exit(1);
        }
    };
    info!(model = llm.model(), "LLM client ready");

    let tools = ToolBox::new(scan_client, registry);
    let agent = ScanAgent::new(Arc::new(llm), tools.clone(), config.agent_max_tool_rounds);

    // Create app state
    let app_state = AppState {
        agent: Arc::new(agent),
        tools,
        request_timeout: config.request_timeout,
    };

    // Check if running in JSON-RPC mode (stdin/stdout) or HTTP server mode
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--mcp") || env::var("MCP_MODE").is_ok() {
        run_mcp_server(app_state).await;
    } else {
        run_http_server(app_state, &config).await;
    }
}
