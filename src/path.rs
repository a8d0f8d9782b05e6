use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// the output location of a page, relative to the output directory
///
/// mirrors the source's directories with the extension forced to `.html`
pub fn output_path<T: AsRef<Path>>(source: T) -> Result<PathBuf> {
    let source = source.as_ref();
    let mut location = PathBuf::new();
    for component in source.components() {
        match component {
            Component::Normal(part) => location.push(part),
            Component::CurDir => {}
            _ => return Err(Error::PathError(source.into())),
        }
    }
    if location.file_name().is_none() {
        return Err(Error::PathError(source.into()));
    }
    location.set_extension("html");
    Ok(location)
}
