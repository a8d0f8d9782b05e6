use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    config::Options,
    document::{transform, Converter, Markup, TitleElement},
    error::{Error, Result},
    files::{collect, FileEntry},
    metadata::{self, Metadata},
    path::output_path,
    templates::Templates,
};

/// a page ready to be rendered, one per source file
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// relative path of the source without its extension
    pub name: String,
    /// the page body as html
    pub contents: String,
    /// front matter, always holding the resolved `layout`
    pub metadata: Metadata,
    /// where the page was read from
    pub source_loc: PathBuf,
    /// where the page is written to, relative to the output directory
    pub dest_loc: PathBuf,
}

/// what a layout gets to see, the metadata with the contents on top
#[derive(Serialize)]
struct RenderContext<'a> {
    #[serde(flatten)]
    metadata: BTreeMap<&'a str, &'a str>,
    contents: &'a str,
}

/// turns source files into pages, holding what every page of a build shares
pub struct Assembler<'a> {
    options: &'a Options,
    converter: &'a dyn Converter,
    title: Option<TitleElement>,
}

impl<'a> Assembler<'a> {
    pub fn new(options: &'a Options, converter: &'a dyn Converter) -> Self {
        let title = options.title_element.as_deref().and_then(TitleElement::new);
        Self {
            options,
            converter,
            title,
        }
    }

    /// build the page for a source file, `None` when it isn't a kind of page we handle
    pub fn assemble(&self, file: &FileEntry) -> Result<Option<Page>> {
        let name = file.name();
        let Some(markup) = file.extension().and_then(Markup::from_extension) else {
            log::info!("Skipping page file with unknown type: {}", file.relative());
            return Ok(None);
        };

        let (mut metadata, body) = metadata::parse(&file.content);
        log::trace!("Parsed metadata for: {name}: {metadata:?}");

        let contents = transform(markup, body, self.converter, &name);
        if let Some(title) = &self.title {
            title.derive(&mut metadata, &contents);
        }

        if !metadata.contains_key("layout") {
            metadata.insert("layout".into(), self.options.default_layout.clone());
        }

        let dest_loc = output_path(file.path())?;
        Ok(Some(Page {
            name,
            contents,
            metadata,
            source_loc: self.options.pages_loc.join(file.path()),
            dest_loc,
        }))
    }
}

impl Page {
    pub fn layout(&self) -> &str {
        self.metadata.get("layout").map_or("", String::as_str)
    }

    /// the full html document for the page
    pub fn render(&self, templates: &Templates) -> Result<String> {
        let ctx = RenderContext {
            metadata: self
                .metadata
                .iter()
                .filter(|(k, _)| k.as_str() != "contents")
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            contents: &self.contents,
        };
        templates.render(&self.name, self.layout(), ctx)
    }

    /// render the page and write it under `destination`, returning the written path
    pub fn write<T: AsRef<Path>>(&self, templates: &Templates, destination: T) -> Result<PathBuf> {
        let result = self.render(templates)?;
        log::trace!(
            "Generated page ({}) from template ({})",
            self.name,
            self.layout()
        );
        let path = destination.as_ref().join(&self.dest_loc);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::file(parent, e))?;
        }
        fs::write(&path, result).map_err(|e| Error::file(&path, e))?;
        log::trace!("Wrote page contents to: {}", path.display());
        Ok(path)
    }
}

/// read and assemble every page under `pages_loc`
///
/// pages are keyed by name, so of `a.md` and `a.html` only the first is kept
pub fn gather_pages(options: &Options, converter: &dyn Converter) -> Result<BTreeMap<String, Page>> {
    if !options.pages_loc.is_dir() {
        return Err(Error::DirError {
            kind: "page",
            path: options.pages_loc.clone(),
        });
    }
    let files = collect(&options.pages_loc, options.recurse_pages, "page")?;

    let assembler = Assembler::new(options, converter);
    let mut pages: BTreeMap<String, Page> = BTreeMap::new();
    for file in files.values() {
        let Some(page) = assembler.assemble(file)? else {
            continue;
        };
        if let Some(existing) = pages.get(&page.name) {
            log::warn!(
                "Skipping {} as {} already produces {}",
                file.relative(),
                existing.source_loc.display(),
                page.dest_loc.display()
            );
            continue;
        }
        pages.insert(page.name.clone(), page);
    }
    log::info!("Parsed {} pages for processing", pages.len());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Markdown;
    use tempfile::TempDir;

    fn entry(path: &str, content: &str) -> FileEntry {
        let mut segments: Vec<String> = path.split('/').map(String::from).collect();
        let filename = segments.pop().unwrap();
        FileEntry {
            segments,
            filename,
            content: content.into(),
        }
    }

    fn assemble(file: &FileEntry, options: &Options) -> Option<Page> {
        Assembler::new(options, &Markdown::default())
            .assemble(file)
            .unwrap()
    }

    fn templates() -> Templates {
        let mut templates = Templates::empty();
        templates
            .add_layout(&entry("basic.html", "<body>{{contents}}</body>"))
            .unwrap();
        templates
            .add_layout(&entry("custom.html", "<custom>{{ title }}|{{contents}}</custom>"))
            .unwrap();
        templates
    }

    #[test]
    fn test_default_layout() {
        let options = Options::default();
        let page = assemble(
            &entry("a.html", "---\ntitle: Hi\n---\n<p>Hello</p>"),
            &options,
        )
        .unwrap();
        assert_eq!(page.layout(), "basic");
        assert_eq!(page.metadata["title"], "Hi");
        assert_eq!(page.dest_loc, PathBuf::from("a.html"));
        assert_eq!(page.source_loc, PathBuf::from("pages/a.html"));
        assert_eq!(page.render(&templates()).unwrap(), "<body><p>Hello</p></body>");
    }

    #[test]
    fn test_explicit_layout() {
        let page = assemble(
            &entry("blog/b.md", "---\nlayout: custom\ntitle: Post\n---\n# Title"),
            &Options::default(),
        )
        .unwrap();
        assert_eq!(page.name, "blog/b");
        assert_eq!(page.dest_loc, PathBuf::from("blog/b.html"));
        assert_eq!(
            page.render(&templates()).unwrap(),
            "<custom>Post|<h1>Title</h1>\n</custom>"
        );
    }

    #[test]
    fn test_unknown_layout_fails() {
        let page = assemble(
            &entry("a.html", "---\nlayout: missing\n---\nx"),
            &Options::default(),
        )
        .unwrap();
        assert!(matches!(
            page.render(&templates()),
            Err(Error::LayoutError { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_skipped() {
        let page = assemble(&entry("notes.txt", "plain"), &Options::default());
        assert!(page.is_none());
    }

    #[test]
    fn test_metadata_cannot_replace_contents() {
        let page = assemble(
            &entry("a.html", "---\ncontents: sneaky\n---\nreal"),
            &Options::default(),
        )
        .unwrap();
        assert_eq!(page.render(&templates()).unwrap(), "<body>real</body>");
    }

    #[test]
    fn test_title_element_fills_missing_titles() {
        let options = Options {
            title_element: Some("h1".into()),
            ..Options::default()
        };
        let markdown = Markdown::default();
        let assembler = Assembler::new(&options, &markdown);
        let derived = assembler
            .assemble(&entry("a.md", "intro\n\n# From *Heading*"))
            .unwrap()
            .unwrap();
        let explicit = assembler
            .assemble(&entry("b.html", "---\ntitle: Given\n---\n<h1>Ignored</h1>"))
            .unwrap()
            .unwrap();
        assert_eq!(derived.metadata["title"], "From Heading");
        assert_eq!(explicit.metadata["title"], "Given");
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let page = assemble(
            &entry("blog/2024/post.html", "hi"),
            &Options::default(),
        )
        .unwrap();
        let path = page.write(&templates(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("blog/2024/post.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<body>hi</body>");
    }

    #[test]
    fn test_gather_pages_keeps_first_duplicate() {
        let dir = TempDir::new().unwrap();
        let pages_loc = dir.path().join("pages");
        fs::create_dir_all(&pages_loc).unwrap();
        fs::write(pages_loc.join("a.html"), "html").unwrap();
        fs::write(pages_loc.join("a.md"), "markdown").unwrap();
        fs::write(pages_loc.join("skip.txt"), "nope").unwrap();

        let options = Options {
            pages_loc,
            ..Options::default()
        };
        let pages = gather_pages(&options, &Markdown::default()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages["a"].contents, "html");
    }

    #[test]
    fn test_gather_pages_missing_dir() {
        let dir = TempDir::new().unwrap();
        let options = Options {
            pages_loc: dir.path().join("pages"),
            ..Options::default()
        };
        assert!(matches!(
            gather_pages(&options, &Markdown::default()),
            Err(Error::DirError { .. })
        ));
    }
}
