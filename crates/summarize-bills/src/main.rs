use anyhow::Result;
use clap::Parser;
use shared::{DataLayout, HuggingFaceConfig, HuggingFaceSummarizer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "summarize-bills")]
#[command(about = "Summarize raw bills with the Hugging Face inference API")]
struct Args {
    /// Repository root holding data/
    #[arg(long, env = "BILL_TRACKER_ROOT", default_value = ".")]
    root: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    shared::logging::init();

    let config = HuggingFaceConfig::from_env()?;
    let layout = DataLayout::new(args.root);

    println!("🤖 Summarizing bills...");
    let summarizer = HuggingFaceSummarizer::new(&config)?;
    let report = shared::summarize_bills(&summarizer, &layout).await?;

    println!(
        "\n✅ Summarized {} bills ({} skipped, {} failed)",
        report.summarized, report.skipped, report.failed
    );

    Ok(())
}
