use anyhow::Result;
use chrono::Local;
use clap::Parser;
use shared::site::GENERATED_DATE_FORMAT;
use shared::DataLayout;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-site")]
#[command(about = "Render site/ from the summarized bills in data/processed_bills")]
struct Args {
    /// Repository root holding data/ and templates/
    #[arg(long, env = "BILL_TRACKER_ROOT", default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    shared::logging::init();

    let layout = DataLayout::new(args.root);
    let generated_date = Local::now().format(GENERATED_DATE_FORMAT).to_string();

    let report = shared::generate_site(&layout, &generated_date)?;

    println!(
        "✅ Generated site with {} bills in {}",
        report.bill_pages,
        layout.site_dir().display()
    );

    Ok(())
}
