// Public modules
pub mod bill_text;
pub mod config;
pub mod congress;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod site;
pub mod summarizer;

// Re-export commonly used types
pub use bill_text::{select_rendition, TextFetcher, TextReport};
pub use config::{CongressConfig, HuggingFaceConfig};
pub use congress::{fetch_bills, CongressClient, FetchReport};
pub use error::{ApiError, ConfigError};
pub use io::DataLayout;
pub use models::{Bill, BillCollection, BillNumber, TextFormat, TextInfo};
pub use site::{generate_html, generate_site, SiteGenerator, SiteReport};
pub use summarizer::{summarize_bills, HuggingFaceSummarizer, SummarizeReport};
