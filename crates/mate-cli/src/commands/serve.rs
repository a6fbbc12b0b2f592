//! Server command implementation

use anyhow::Result;

use mate_core::{InsightEngine, InsightsConfig};
use mate_server::ServerConfig;

pub async fn cmd_serve(
    config: InsightsConfig,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Mate web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Anomaly sensitivity: {}", config.sensitivity);
    println!("   Forecast horizon: {} months", config.forecast_periods);

    if allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }

    if host != "127.0.0.1" && host != "localhost" {
        println!();
        println!("   ⚠️  The API has no authentication - only expose it on trusted networks");
    }
    println!();

    let server_config = ServerConfig { allowed_origins };
    mate_server::serve_with_config(InsightEngine::with_config(config), host, port, server_config)
        .await
}
