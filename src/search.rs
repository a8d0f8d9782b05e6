use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;
use tantivy::{
    collector::TopDocs,
    doc,
    query::QueryParser,
    schema::{Schema, Value, STORED, STRING, TEXT},
    Index, IndexWriter, TantivyDocument,
};

use crate::{
    error::{Error, Result},
    files::collect_matching,
    utils::strip_tags,
};

const WRITER_MEMORY: usize = 50_000_000;

/// a generated page as it goes into the index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub url: String,
    pub title: String,
    pub content: String,
}

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").unwrap());
static RE_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1(?:\s[^>]*)?>(.*?)</h1\s*>").unwrap());
static RE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body(?:\s[^>]*)?>(.*)</body\s*>").unwrap());

impl IndexEntry {
    fn from_html(url: String, html: &str) -> Self {
        let title = [&*RE_TITLE, &*RE_H1]
            .into_iter()
            .find_map(|re| first_text(html, re))
            .unwrap_or_default();
        Self {
            url,
            title,
            content: strip_tags(body_of(html)),
        }
    }
}

fn first_text(html: &str, re: &Regex) -> Option<String> {
    let text = strip_tags(re.captures(html)?.get(1)?.as_str());
    (!text.is_empty()).then_some(text)
}

/// the contents of `<body>`, or the whole document when it has none
fn body_of(html: &str) -> &str {
    RE_BODY
        .captures(html)
        .and_then(|c| c.get(1))
        .map_or(html, |m| m.as_str())
}

fn schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field("url", STRING | STORED);
    builder.add_text_field("title", TEXT | STORED);
    builder.add_text_field("content", TEXT);
    builder.build()
}

/// index every html file under `destination` into a fresh index at `index_dir`
///
/// returns once the index is committed and all of its writer threads are done
pub fn build_index<D: AsRef<Path>, I: AsRef<Path>>(destination: D, index_dir: I) -> Result<usize> {
    let (destination, index_dir) = (destination.as_ref(), index_dir.as_ref());
    log::trace!("Building search index at {}", index_dir.display());

    match fs::remove_dir_all(index_dir) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            return Err(Error::file(index_dir, e));
        }
        _ => {}
    }
    fs::create_dir_all(index_dir).map_err(|e| Error::file(index_dir, e))?;

    let schema = schema();
    let url = schema.get_field("url")?;
    let title = schema.get_field("title")?;
    let content = schema.get_field("content")?;

    let index = Index::create_in_dir(index_dir, schema)?;
    let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY)?;

    let mut count = 0;
    let pages = collect_matching(destination, true, "index", |name| name.ends_with(".html"))?;
    for (path, file) in pages {
        let entry = IndexEntry::from_html(format!("/{path}"), &file.content);
        log::trace!("Indexing {}", entry.url);
        writer.add_document(doc!(
            url => entry.url,
            title => entry.title,
            content => entry.content,
        ))?;
        count += 1;
    }

    writer.commit()?;
    writer.wait_merging_threads()?;
    log::info!("Indexed {count} pages into {}", index_dir.display());
    Ok(count)
}

/// urls of the pages in the index at `index_dir` that match `query`
pub fn search<T: AsRef<Path>>(index_dir: T, query: &str, limit: usize) -> Result<Vec<String>> {
    let index = Index::open_in_dir(index_dir)?;
    let schema = index.schema();
    let url = schema.get_field("url")?;
    let title = schema.get_field("title")?;
    let content = schema.get_field("content")?;

    let searcher = index.reader()?.searcher();
    let query = QueryParser::for_index(&index, vec![title, content]).parse_query(query)?;

    let mut urls = Vec::new();
    for (_score, address) in searcher.search(&query, &TopDocs::with_limit(limit))? {
        let doc: TantivyDocument = searcher.doc(address)?;
        if let Some(found) = doc.get_first(url).and_then(|v| v.as_str()) {
            urls.push(found.to_string());
        }
    }
    Ok(urls)
}
