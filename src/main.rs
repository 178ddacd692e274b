use anyhow::Result;
use vision::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
