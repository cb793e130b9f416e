//! Static site rendering from bill JSON.
//!
//! Two entry points share one renderer: [`generate_html`] starts from the
//! aggregate `bills.json` and writes `public/`, while [`generate_site`] starts
//! from the summarized per-bill files and writes `site/`.

use anyhow::{Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::io::{self, DataLayout};
use crate::models::{Bill, BillCollection};

pub const INDEX_TEMPLATE: &str = "index.html";
pub const BILL_TEMPLATE: &str = "bill.html";
pub const BILL_TEXT_TEMPLATE: &str = "bill_text.html";

/// Timestamp format shown on generated pages.
pub const GENERATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Template view of a bill: the record with `ai_summary` always present
/// (`null` when missing), its id, and whether its full-text page exists.
#[derive(Serialize)]
struct BillView {
    bill_id: String,
    has_text_page: bool,
    #[serde(flatten)]
    bill: Bill,
}

impl BillView {
    fn new(bill: &Bill) -> Self {
        let mut bill = bill.clone();
        let summary = bill.ai_summary().map(String::from);
        bill.set_ai_summary(summary);
        Self {
            bill_id: bill.bill_id(),
            has_text_page: false,
            bill,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub bill_pages: usize,
    pub text_pages: usize,
    pub text_failures: usize,
}

pub struct SiteGenerator {
    env: Environment<'static>,
    layout: DataLayout,
}

impl SiteGenerator {
    /// Load templates from the layout's `templates/` directory.
    pub fn new(layout: &DataLayout) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(layout.templates_dir()));
        Self {
            env,
            layout: layout.clone(),
        }
    }

    /// Render one page per bill, a full-text page for bills with saved text,
    /// and the index. Existing output is overwritten.
    pub fn render(
        &self,
        bills: &[Bill],
        output_dir: &Path,
        generated_date: &str,
    ) -> Result<SiteReport> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let bill_template = self
            .env
            .get_template(BILL_TEMPLATE)
            .context("Failed to load bill template")?;

        let mut report = SiteReport::default();
        let mut views = Vec::with_capacity(bills.len());

        for bill in bills {
            let mut view = BillView::new(bill);

            if view.bill.text_info().is_some() {
                match self.render_text_page(&view, output_dir, generated_date) {
                    Ok(()) => {
                        view.has_text_page = true;
                        report.text_pages += 1;
                    }
                    Err(e) => {
                        warn!(bill_id = %view.bill_id, error = %format!("{:#}", e), "error generating text page");
                        println!("Error generating text page for {}", view.bill_id);
                        report.text_failures += 1;
                    }
                }
            }

            let html = bill_template
                .render(context! { bill => &view, generated_date => generated_date })
                .with_context(|| format!("Failed to render page for {}", view.bill_id))?;
            let output_file = output_dir.join(format!("bill_{}.html", view.bill_id));
            fs::write(&output_file, html)
                .with_context(|| format!("Failed to write {}", output_file.display()))?;
            report.bill_pages += 1;

            views.push(view);
        }

        let index = self
            .env
            .get_template(INDEX_TEMPLATE)
            .context("Failed to load index template")?
            .render(context! { bills => &views, generated_date => generated_date })
            .context("Failed to render index page")?;
        let index_file = output_dir.join("index.html");
        fs::write(&index_file, index)
            .with_context(|| format!("Failed to write {}", index_file.display()))?;

        info!(
            output = %output_dir.display(),
            bill_pages = report.bill_pages,
            text_pages = report.text_pages,
            "site generated"
        );
        Ok(report)
    }

    fn render_text_page(
        &self,
        view: &BillView,
        output_dir: &Path,
        generated_date: &str,
    ) -> Result<()> {
        let Some(text_info) = view.bill.text_info() else {
            return Ok(());
        };

        let text_path = self.layout.resolve(&text_info.path);
        let bill_text = fs::read_to_string(&text_path)
            .with_context(|| format!("Failed to read {}", text_path.display()))?;

        let html = self
            .env
            .get_template(BILL_TEXT_TEMPLATE)
            .context("Failed to load bill text template")?
            .render(context! {
                bill => view,
                bill_text => bill_text,
                generated_date => generated_date,
            })
            .context("Failed to render bill text page")?;

        let output_file = output_dir.join(format!("bill_text_{}.html", view.bill_id));
        fs::write(&output_file, html)
            .with_context(|| format!("Failed to write {}", output_file.display()))
    }
}

/// Map of bill id to the summary stored in `processed_bills/`.
pub fn load_processed_summaries(processed_dir: &Path) -> Result<HashMap<String, Option<String>>> {
    Ok(load_bill_files(processed_dir)?
        .into_iter()
        .map(|bill| (bill.bill_id(), bill.ai_summary().map(String::from)))
        .collect())
}

/// Every processed bill, newest `updateDate` first. Equal dates are ordered
/// by bill id so the output does not depend on directory order.
pub fn load_processed_bills(processed_dir: &Path) -> Result<Vec<Bill>> {
    let mut bills = load_bill_files(processed_dir)?;
    bills.sort_by(|a, b| {
        b.update_date()
            .cmp(&a.update_date())
            .then_with(|| a.bill_id().cmp(&b.bill_id()))
    });
    Ok(bills)
}

fn load_bill_files(dir: &Path) -> Result<Vec<Bill>> {
    let mut bills = Vec::new();
    for path in io::list_json_files(dir)? {
        match io::read_json::<Bill>(&path) {
            Ok(bill) => bills.push(bill),
            Err(e) => {
                warn!(file = %path.display(), error = %format!("{:#}", e), "skipping unreadable bill file");
            }
        }
    }
    Ok(bills)
}

/// Render `public/` from `bills.json`, merging summaries from `processed_bills/`.
pub fn generate_html(layout: &DataLayout, generated_date: &str) -> Result<SiteReport> {
    let mut collection: BillCollection = io::read_json(&layout.bills_file())?;
    let summaries = load_processed_summaries(&layout.processed_bills_dir())?;

    for bill in collection.bills.iter_mut() {
        bill.set_ai_summary(summaries.get(&bill.bill_id()).cloned().flatten());
    }

    SiteGenerator::new(layout).render(&collection.bills, &layout.public_dir(), generated_date)
}

/// Render `site/` from the processed per-bill files alone.
pub fn generate_site(layout: &DataLayout, generated_date: &str) -> Result<SiteReport> {
    let bills = load_processed_bills(&layout.processed_bills_dir())?;
    SiteGenerator::new(layout).render(&bills, &layout.site_dir(), generated_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DataLayout) {
        let tmp = TempDir::new().unwrap();
        let layout = DataLayout::new(tmp.path());
        let templates = layout.templates_dir();
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join(INDEX_TEMPLATE),
            "{{ generated_date }}|{% for bill in bills %}{{ bill.bill_id }}{% if bill.has_text_page %}+text{% endif %};{% endfor %}",
        )
        .unwrap();
        fs::write(
            templates.join(BILL_TEMPLATE),
            "{{ bill.bill_id }}:{{ bill.title }}:{% if bill.ai_summary is none %}null{% else %}{{ bill.ai_summary }}{% endif %}",
        )
        .unwrap();
        fs::write(
            templates.join(BILL_TEXT_TEMPLATE),
            "{{ bill.bill_id }}|{{ bill_text }}",
        )
        .unwrap();
        (tmp, layout)
    }

    fn write_bills(layout: &DataLayout) {
        io::write_json(
            &layout.bills_file(),
            &json!({"bills": [
                {
                    "congress": 118, "type": "HR", "number": "1", "title": "A & B",
                    "text_info": {"format": "txt", "path": "data/bill_texts/hr1.txt"}
                },
                {
                    "congress": 118, "type": "S", "number": "2", "title": "Second",
                    "text_info": {"format": "html", "path": "data/bill_texts/missing.html"}
                },
                {"congress": 118, "type": "S", "number": "3", "title": "Third"}
            ]}),
        )
        .unwrap();
        fs::create_dir_all(layout.bill_texts_dir()).unwrap();
        fs::write(layout.bill_texts_dir().join("hr1.txt"), "SEC. 1 <short>").unwrap();
        io::write_json(
            &layout.processed_bills_dir().join("hr1.json"),
            &json!({"congress": 118, "type": "hr", "number": 1, "ai_summary": "AI says"}),
        )
        .unwrap();
    }

    #[test]
    fn test_generate_html_pages() {
        let (_tmp, layout) = setup();
        write_bills(&layout);

        let report = generate_html(&layout, "2024-01-01 00:00:00").unwrap();
        assert_eq!(
            report,
            SiteReport {
                bill_pages: 3,
                text_pages: 1,
                text_failures: 1,
            }
        );

        let public = layout.public_dir();
        assert_eq!(
            fs::read_to_string(public.join("bill_hr1.html")).unwrap(),
            "hr1:A &amp; B:AI says"
        );
        assert_eq!(
            fs::read_to_string(public.join("bill_s3.html")).unwrap(),
            "s3:Third:null"
        );
        assert_eq!(
            fs::read_to_string(public.join("bill_text_hr1.html")).unwrap(),
            "hr1|SEC. 1 &lt;short&gt;"
        );
        assert!(public.join("bill_s2.html").exists());
        assert!(!public.join("bill_text_s2.html").exists());
        assert_eq!(
            fs::read_to_string(public.join("index.html")).unwrap(),
            "2024-01-01 00:00:00|hr1+text;s2;s3;"
        );
    }

    #[test]
    fn test_generate_html_is_idempotent() {
        let (_tmp, layout) = setup();
        write_bills(&layout);

        generate_html(&layout, "2024-01-01 00:00:00").unwrap();
        let first = fs::read_to_string(layout.public_dir().join("bill_hr1.html")).unwrap();
        let first_index = fs::read_to_string(layout.public_dir().join("index.html")).unwrap();

        generate_html(&layout, "2024-01-01 00:00:00").unwrap();
        assert_eq!(
            fs::read_to_string(layout.public_dir().join("bill_hr1.html")).unwrap(),
            first
        );
        assert_eq!(
            fs::read_to_string(layout.public_dir().join("index.html")).unwrap(),
            first_index
        );
    }

    #[test]
    fn test_processed_bills_sorted_by_date_then_id() {
        let (_tmp, layout) = setup();
        let dir = layout.processed_bills_dir();
        for (id, number, date) in [
            ("s9", 9, Some("2024-01-01")),
            ("hr5", 5, Some("2024-02-01")),
            ("hr4", 4, Some("2024-01-01")),
            ("hr7", 7, None),
        ] {
            let mut bill = json!({"congress": 118, "type": &id[..id.len() - 1], "number": number});
            if let Some(date) = date {
                bill["updateDate"] = json!(date);
            }
            io::write_json(&dir.join(format!("{}.json", id)), &bill).unwrap();
        }
        fs::write(dir.join("broken.json"), "{").unwrap();

        let ids: Vec<String> = load_processed_bills(&dir)
            .unwrap()
            .iter()
            .map(Bill::bill_id)
            .collect();
        assert_eq!(ids, vec!["hr5", "hr4", "s9", "hr7"]);
    }

    #[test]
    fn test_generate_site_uses_processed_bills() {
        let (_tmp, layout) = setup();
        io::write_json(
            &layout.processed_bills_dir().join("s1.json"),
            &json!({"congress": 118, "type": "S", "number": "1", "title": "T", "ai_summary": "Sum"}),
        )
        .unwrap();

        let report = generate_site(&layout, "now").unwrap();
        assert_eq!(report.bill_pages, 1);
        assert_eq!(
            fs::read_to_string(layout.site_dir().join("bill_s1.html")).unwrap(),
            "s1:T:Sum"
        );
        assert_eq!(
            fs::read_to_string(layout.site_dir().join("index.html")).unwrap(),
            "now|s1;"
        );
    }

    #[test]
    fn test_processed_bill_without_summary_renders_null() {
        let (_tmp, layout) = setup();
        io::write_json(
            &layout.processed_bills_dir().join("hr8.json"),
            &json!({"congress": 118, "type": "HR", "number": 8, "title": "No AI"}),
        )
        .unwrap();

        generate_site(&layout, "now").unwrap();
        assert_eq!(
            fs::read_to_string(layout.site_dir().join("bill_hr8.html")).unwrap(),
            "hr8:No AI:null"
        );
    }

    #[test]
    fn test_missing_bills_file_is_error() {
        let (_tmp, layout) = setup();
        assert!(generate_html(&layout, "now").is_err());
    }
}
