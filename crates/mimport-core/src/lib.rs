pub mod config;
pub mod logging;

pub mod downloader;
pub mod importer;
pub mod layout;
pub mod manifest;
pub mod resolver;
pub mod retry;
pub mod storage;
pub mod url_model;

pub use importer::{run_import, ImportEvent, ImportSettings, ImportSummary};
pub use manifest::{load_manifest, Manifest, ManifestError};
