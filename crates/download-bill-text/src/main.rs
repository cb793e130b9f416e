use anyhow::Result;
use clap::Parser;
use shared::{CongressClient, CongressConfig, DataLayout, TextFetcher};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "download-bill-text")]
#[command(about = "Download the full text of every bill in data/bills.json")]
struct Args {
    /// Repository root holding data/
    #[arg(long, env = "BILL_TRACKER_ROOT", default_value = ".")]
    root: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    shared::logging::init();

    let config = CongressConfig::from_env()?;
    let layout = DataLayout::new(args.root);

    let client = CongressClient::new(&config)?;
    let report = TextFetcher::new(&client, &layout).run().await?;

    println!(
        "\n✅ Downloaded text for {}/{} bills ({} without text, {} failed)",
        report.with_text, report.processed, report.without_text, report.failed
    );

    Ok(())
}
