use std::{fs, io, path::Path};

use crate::error::{Error, Result};

/// copy a directory tree, links inside it are copied as links and never followed
fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let dest = to.join(entry.file_name());
        if ty.is_symlink() {
            copy_link(&entry.path(), &dest)?;
        } else if ty.is_dir() {
            copy_dir(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), dest)?;
        }
    }
    Ok(())
}

/// recreate `link` at `dest` pointing at the same target, replacing what was there
#[cfg(unix)]
fn copy_link(link: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(link)?;
    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dest)?,
        Ok(_) => fs::remove_file(dest)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    log::trace!("Linking {} to {}", dest.display(), target.display());
    std::os::unix::fs::symlink(target, dest)
}

/// without portable links a linked file is copied and a linked directory left out
#[cfg(not(unix))]
fn copy_link(link: &Path, dest: &Path) -> io::Result<()> {
    if link.is_file() {
        fs::copy(link, dest).map(|_| ())
    } else {
        log::warn!("Not copying linked directory: {}", link.display());
        Ok(())
    }
}

/// copy a file or a whole directory, creating whatever parents `to` needs
pub fn copy_path(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    let copied = if from.is_dir() {
        copy_dir(from, to)
    } else {
        to.parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::copy(from, to).map(|_| ()))
    };
    copied.map_err(|error| Error::CopyError {
        from: from.into(),
        to: to.into(),
        error,
    })
}

/// the text of some html, tags removed and whitespace collapsed
pub fn strip_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                result.push(' ');
            }
            '>' if in_tag => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
