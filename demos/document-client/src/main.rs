//! Document client
//!
//! Connects a [`Client`] to the document server over the in-memory
//! transport, lists the tools, reads one document through the
//! `read_doc_content` tool, lists every document id through the
//! `docs://documents` resource, and cleans up.
//!
//! # Running
//!
//! ```bash
//! cargo run -p document-client
//! SCOPEKIT_DOC_ID=plan.md cargo run -p document-client
//! SCOPEKIT_REQUEST_TIMEOUT_MS=500 RUST_LOG=debug cargo run -p document-client
//! ```

use std::time::Duration;

use scopekit::client::{Client, ClientBuilder};
use scopekit::server::{DocumentStore, document_server};
use scopekit::transport::{MemoryConnector, TransportConfig};
use serde_json::json;
use tracing::{info, warn};

const DEFAULT_DOC_ID: &str = "report.pdf";

fn transport_config() -> TransportConfig {
    let config = TransportConfig::new();
    match std::env::var("SCOPEKIT_REQUEST_TIMEOUT_MS") {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ms) => config.request_timeout(Duration::from_millis(ms)),
            Err(err) => {
                warn!(value = %raw, error = %err, "Ignoring invalid SCOPEKIT_REQUEST_TIMEOUT_MS");
                config
            }
        },
        Err(_) => config,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("document_client=info".parse()?),
        )
        .init();

    let doc_id = std::env::var("SCOPEKIT_DOC_ID").unwrap_or_else(|_| DEFAULT_DOC_ID.to_string());
    let connector = MemoryConnector::with_config(
        document_server(DocumentStore::default()),
        transport_config(),
    );

    let mut client = ClientBuilder::new().name("document-client").build(connector);
    let init = client.connect().await?;
    info!(
        server = %init.server_info.name,
        version = %init.server_info.version,
        "Connected"
    );
    client.defer_cleanup("goodbye", || async {
        info!("Client cleaned up");
    })?;

    let outcome = run(&client, &doc_id).await;
    client.cleanup().await?;
    outcome
}

async fn run(
    client: &Client<MemoryConnector<scopekit::server::Server>>,
    doc_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let tools = client.list_tools().await?;
    println!("tools:");
    for tool in &tools {
        println!(
            "  {} - {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }

    println!("\n==================================");
    println!("\n Call Read Document Tool");
    let content = client
        .call_tool("read_doc_content", json!({ "doc_id": doc_id }))
        .await?;
    if content.is_error() {
        println!("error: {}", content.text_content());
    } else {
        println!("{}", content.text_content());
    }

    println!("\n==================================");
    println!("\n Read Document List Resource");
    let ids = client.read_resource_value("docs://documents").await?;
    println!("{}", serde_json::to_string_pretty(&ids)?);

    Ok(())
}
