use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// a file found while walking a source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// directories between the root and the file
    pub segments: Vec<String>,
    pub filename: String,
    pub content: String,
}

impl FileEntry {
    /// the path relative to the collection root, always `/` separated
    pub fn relative(&self) -> String {
        self.segments
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.filename.as_str()))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// the filename up to its last `.`
    pub fn stem(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.filename,
        }
    }

    /// the text after the last `.` in the filename
    pub fn extension(&self) -> Option<&str> {
        match self.filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }

    /// the relative path without the extension, used as the page's name
    pub fn name(&self) -> String {
        self.segments
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.stem()))
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn path(&self) -> PathBuf {
        self.segments.iter().collect::<PathBuf>().join(&self.filename)
    }
}

/// read the files of a directory, keyed by their relative path
///
/// only the root has to be readable, anything below it that can't be read is skipped
pub fn collect<T: AsRef<Path>>(
    root: T,
    recurse: bool,
    kind: &str,
) -> Result<BTreeMap<String, FileEntry>> {
    collect_matching(root, recurse, kind, |_| true)
}

/// like [`collect`], only reading the files whose name passes `keep`
pub fn collect_matching<T: AsRef<Path>>(
    root: T,
    recurse: bool,
    kind: &str,
    keep: impl Fn(&str) -> bool,
) -> Result<BTreeMap<String, FileEntry>> {
    let root = root.as_ref();
    log::trace!("Looking for {kind} files at: {}", root.display());
    let mut files = BTreeMap::new();
    let entries = root.read_dir().map_err(|e| Error::file(root, e))?;
    let walk = Walk {
        recurse,
        kind,
        keep: &keep,
    };
    walk.collect_into(entries, &mut Vec::new(), &mut files);
    log::debug!("Found {} {kind} entries", files.len());
    Ok(files)
}

struct Walk<'a> {
    recurse: bool,
    kind: &'a str,
    keep: &'a dyn Fn(&str) -> bool,
}

impl Walk<'_> {
    fn collect_into(
        &self,
        entries: fs::ReadDir,
        segments: &mut Vec<String>,
        files: &mut BTreeMap<String, FileEntry>,
    ) {
        let kind = self.kind;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Unable to read {kind} entry: {err}");
                    continue;
                }
            };
            let path = entry.path();
            let Some(filename) = entry.file_name().to_str().map(String::from) else {
                log::warn!("Skipping {kind} entry with a non utf-8 name: {}", path.display());
                continue;
            };

            let ty = match entry.file_type() {
                Ok(ty) => ty,
                Err(err) => {
                    log::warn!("Unable to read {kind} entry {filename}: {err}");
                    continue;
                }
            };
            // linked directories are never descended into, a link back up the tree would loop
            let is_file = ty.is_file() || (ty.is_symlink() && path.is_file());

            if ty.is_dir() {
                if !self.recurse {
                    log::trace!("Skipping non-file {kind} entry: {filename}");
                    continue;
                }
                match path.read_dir() {
                    Ok(children) => {
                        segments.push(filename);
                        self.collect_into(children, segments, files);
                        segments.pop();
                    }
                    Err(err) => log::warn!("Unable to read {kind} directory {filename}: {err}"),
                }
            } else if is_file && !(self.keep)(&filename) {
                log::trace!("Ignoring {kind} entry: {filename}");
            } else if is_file {
                match fs::read_to_string(&path) {
                    Ok(content) => {
                        log::trace!("Found {kind}: {filename}");
                        let file = FileEntry {
                            segments: segments.clone(),
                            filename,
                            content,
                        };
                        files.insert(file.relative(), file);
                    }
                    Err(err) => log::warn!("Unable to read {kind} file {filename}: {err}"),
                }
            } else {
                log::trace!("Skipping non-file {kind} entry: {filename}");
            }
        }
    }
}
