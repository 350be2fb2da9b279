use project_graph::{DocumentStore, HttpServer};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8529;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = match std::env::var("PROJECT_GRAPH_PORT") {
        Ok(value) => match value.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("Error: PROJECT_GRAPH_PORT is not a valid port: {}", value);
                std::process::exit(1);
            }
        },
        Err(_) => DEFAULT_PORT,
    };

    println!("Project Graph in-memory document server v{}", project_graph::VERSION);
    println!("Seed it with: project-graph-seed --port {}", port);

    let store = Arc::new(RwLock::new(DocumentStore::new()));
    let server = HttpServer::new(store, port);
    if let Err(e) = server.start().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
