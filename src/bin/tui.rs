use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dueline::tui::run().await
}
