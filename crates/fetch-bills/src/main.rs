use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{CongressClient, CongressConfig, DataLayout};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fetch-bills")]
#[command(about = "Fetch recently updated bills from the Congress.gov API")]
struct Args {
    /// Repository root holding data/
    #[arg(long, env = "BILL_TRACKER_ROOT", default_value = ".")]
    root: PathBuf,

    /// Number of days to look back for updated bills
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(i64).range(0..))]
    days: i64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    shared::logging::init();

    let config = CongressConfig::from_env()?;
    let layout = DataLayout::new(args.root);

    println!("📜 Fetching bills updated in the past {} day(s)...", args.days);
    let client = CongressClient::new(&config)?;
    let report = shared::fetch_bills(&client, &layout, Utc::now(), args.days)
        .await
        .context("Error fetching bills")?;

    println!(
        "✅ Successfully fetched and saved {} bills to {}",
        report.written,
        layout.raw_bills_dir().display()
    );

    Ok(())
}
