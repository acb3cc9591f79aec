/*
 * Responsibility
 * - tokio runtime
 * - call gateway_auth::app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gateway_auth::app::run().await
}
