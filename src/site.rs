//
// A build runs start to finish in one pass, nothing is kept between runs:
//
//   clean the output, compile the layouts, then every page is parsed, converted,
//   wrapped in its layout and written at the same relative location it was read
//   from, eg pages/blog/post.md -> build/blog/post.html
//
// after the pages the static copies are made in the order they are listed, and
// last the search index is built from whatever html ended up in the output.
//
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::{
    config::Options,
    document::Markdown,
    error::{Error, Result},
    page::gather_pages,
    search::build_index,
    templates::Templates,
    utils::copy_path,
};

/// what a finished build produced
#[derive(Debug)]
pub struct BuildReport {
    /// every page written, in the order they were written
    pub pages: Vec<PathBuf>,
    /// number of pages in the search index, when one was built
    pub indexed: Option<usize>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Site {
    options: Options,
}

impl Site {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn run(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let options = &self.options;
        log::info!("Starting build...");

        if options.clean {
            log::debug!("Cleaning previous build...");
            clean(&options.destination)?;
            log::trace!(
                "Removed previous build folder: {}",
                options.destination.display()
            );
        } else {
            log::trace!("Skipping clean step");
        }

        let templates = Templates::load(&options.layouts_loc, &options.partials_loc)?;
        log::info!(
            "Parsed {} templates for use: {}",
            templates.layouts().count(),
            templates.layouts().collect::<Vec<_>>().join(",")
        );

        fs::create_dir_all(&options.destination)
            .map_err(|e| Error::file(&options.destination, e))?;
        log::debug!(
            "Created new build directory at: {}",
            options.destination.display()
        );

        let converter = Markdown::new(options.markdown.options());
        let pages = gather_pages(options, &converter)?
            .values()
            .map(|page| page.write(&templates, &options.destination))
            .collect::<Result<Vec<_>>>()?;

        for copy in &options.static_copy {
            let dest = options.destination.join(&copy.dest);
            log::trace!("copying {} to {}", copy.source.display(), dest.display());
            copy_path(&copy.source, &dest)?;
        }
        if !options.static_copy.is_empty() {
            log::info!(
                "Copied static assets to {}",
                options.destination.display()
            );
        }

        let indexed = if options.build_index {
            Some(build_index(&options.destination, options.index_dir())?)
        } else {
            None
        };

        let elapsed = start.elapsed();
        log::info!("Finished build in {}", format_elapsed(elapsed));
        Ok(BuildReport {
            pages,
            indexed,
            elapsed,
        })
    }
}

/// remove a previous build, it not being there is fine
fn clean<T: AsRef<Path>>(destination: T) -> Result<()> {
    let destination = destination.as_ref();
    match fs::remove_dir_all(destination) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(Error::file(destination, e)),
        _ => Ok(()),
    }
}

/// milliseconds up to a second, then seconds to one decimal place
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis > 1000 {
        format!("{:.1}s", (millis as f64 / 100.0).round() / 10.0)
    } else {
        format!("{millis}ms")
    }
}
