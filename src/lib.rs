pub mod config;
pub mod document;
pub mod error;
pub mod files;
pub mod logging;
pub mod metadata;
pub mod page;
pub mod path;
pub mod search;
pub mod site;
pub mod templates;
pub mod utils;

pub use config::Options;
pub use error::{Error, Result};
pub use site::{BuildReport, Site};
