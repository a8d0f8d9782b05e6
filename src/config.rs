use std::path::{Path, PathBuf};

use figment::providers::{Format, Json, Serialized};
use figment::{Error, Figment, Metadata, Provider};
use serde::{Deserialize, Serialize};

/// name of the config file read when none is given on the command line
pub const CONFIG_FILE: &str = "build.json";

/// options for a build, every field can be overridden by the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// the output directory
    pub destination: PathBuf,
    /// remove the output directory before building
    pub clean: bool,
    /// the layout used by pages that don't name one
    pub default_layout: String,
    /// directory holding the layouts
    pub layouts_loc: PathBuf,
    /// directory holding the partials that layouts can include
    pub partials_loc: PathBuf,
    /// directory holding the page sources
    pub pages_loc: PathBuf,
    /// files and directories copied verbatim into the output
    pub static_copy: Vec<StaticCopy>,
    /// build a search index over the generated html
    pub build_index: bool,
    /// descend into subdirectories of `pages_loc`
    pub recurse_pages: bool,
    /// tag whose first occurrence gives a page its title when it has none
    pub title_element: Option<String>,
    /// markdown parser options
    pub markdown: MarkdownOptions,
}

/// a single static copy, `dest` is relative to the output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCopy {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// config options for the markdown parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    /// enable math mode
    pub math: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            destination: "build/".into(),
            clean: true,
            default_layout: "basic".into(),
            layouts_loc: "layouts/".into(),
            partials_loc: "layouts/partials/".into(),
            pages_loc: "pages/".into(),
            static_copy: Vec::new(),
            build_index: false,
            recurse_pages: false,
            title_element: None,
            markdown: MarkdownOptions::default(),
        }
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
            math: false,
        }
    }
}

impl Options {
    pub fn figment() -> Figment {
        Figment::from(Self::default())
    }

    pub fn from<T: Provider>(provider: T) -> Result<Self, Error> {
        Self::figment().merge(provider).extract()
    }

    /// load the options from a json file laid over the defaults
    ///
    /// a missing or malformed file is not an error, the defaults are used instead
    pub fn load<T: AsRef<Path>>(path: T) -> Self {
        let path = path.as_ref();
        log::trace!("Reading options from file: {}", path.display());
        if !path.is_file() {
            log::warn!("Unable to read options from file: {}", path.display());
            return Self::default();
        }
        match Self::from(Json::file_exact(path)) {
            Ok(options) => {
                log::trace!("Using options: {options:?}");
                options
            }
            Err(err) => {
                log::warn!(
                    "Unable to read options from file: {} ({err})",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// where the search index is written, a sibling of the output directory
    pub fn index_dir(&self) -> PathBuf {
        let dest = self.destination.to_string_lossy();
        PathBuf::from(format!("{}__pagefind", dest.trim_end_matches(['/', '\\'])))
    }
}

impl Provider for Options {
    fn metadata(&self) -> Metadata {
        Metadata::named("Build defaults")
    }
    fn data(&self) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, Error> {
        Serialized::defaults(self).data()
    }
}

impl MarkdownOptions {
    pub fn options(&self) -> pulldown_cmark::Options {
        use pulldown_cmark::Options;
        let mut options = Options::empty();
        if self.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.math {
            options.insert(Options::ENABLE_MATH);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let options = Options::load(dir.path().join("nope.json"));
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.json");
        fs::write(
            &path,
            r#"{
                "destination": "out/",
                "clean": false,
                "static_copy": [{"source": "css", "dest": "assets/css"}],
                "title_element": "h1",
                "markdown": {"math": true},
                "unknown_key": 42
            }"#,
        )
        .unwrap();

        let options = Options::load(&path);
        assert_eq!(options.destination, PathBuf::from("out/"));
        assert!(!options.clean);
        assert_eq!(options.default_layout, "basic");
        assert_eq!(options.pages_loc, PathBuf::from("pages/"));
        assert_eq!(
            options.static_copy,
            vec![StaticCopy {
                source: "css".into(),
                dest: "assets/css".into()
            }]
        );
        assert_eq!(options.title_element.as_deref(), Some("h1"));
        assert!(options.markdown.math);
        assert!(options.markdown.tables);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Options::load(&path), Options::default());
    }

    #[test]
    fn test_index_dir_trims_separator() {
        let options = Options::default();
        assert_eq!(options.index_dir(), PathBuf::from("build__pagefind"));

        let options = Options {
            destination: "site".into(),
            ..Options::default()
        };
        assert_eq!(options.index_dir(), PathBuf::from("site__pagefind"));
    }
}
