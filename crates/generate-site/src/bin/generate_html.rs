use anyhow::Result;
use chrono::Local;
use clap::Parser;
use shared::site::GENERATED_DATE_FORMAT;
use shared::DataLayout;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-html")]
#[command(about = "Render public/ from data/bills.json, AI summaries and bill texts")]
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

    let report = shared::generate_html(&layout, &generated_date)?;

    println!(
        "✅ Generated {} bill pages and {} text pages in {}",
        report.bill_pages,
        report.text_pages,
        layout.public_dir().display()
    );

    Ok(())
}
