use std::{collections::BTreeSet, path::Path};

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    files::{collect, FileEntry},
};

/// the compiled layouts and partials of a site
///
/// both live in the same environment so layouts can `{% include %}` partials by
/// name, only the layouts can wrap a page
pub struct Templates {
    env: Environment<'static>,
    layouts: BTreeSet<String>,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates")
            .field("layouts", &self.layouts)
            .finish_non_exhaustive()
    }
}

impl Templates {
    /// compile every layout and register every partial
    ///
    /// the layouts directory has to exist, partials are optional
    pub fn load<L: AsRef<Path>, P: AsRef<Path>>(layouts_loc: L, partials_loc: P) -> Result<Self> {
        let (layouts_loc, partials_loc) = (layouts_loc.as_ref(), partials_loc.as_ref());
        let mut templates = Self::empty();

        if partials_loc.is_dir() {
            let partials = collect(partials_loc, false, "partial")?;
            for partial in partials.values() {
                templates.add_partial(partial)?;
            }
            log::trace!("Registered {} partials", partials.len());
        } else {
            log::warn!("No partials directory at {}", partials_loc.display());
        }

        if !layouts_loc.is_dir() {
            return Err(Error::DirError {
                kind: "layout",
                path: layouts_loc.into(),
            });
        }
        for layout in collect(layouts_loc, false, "layout")?.values() {
            templates.add_layout(layout)?;
        }
        log::debug!("Compiled {} layout templates", templates.layouts.len());
        Ok(templates)
    }

    pub fn empty() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        // names carry no extension, so html contents are never escaped
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self {
            env,
            layouts: BTreeSet::new(),
        }
    }

    pub fn add_partial(&mut self, file: &FileEntry) -> Result<()> {
        self.env
            .add_template_owned(file.stem().to_string(), file.content.clone())?;
        log::trace!("Registered {} partial", file.stem());
        Ok(())
    }

    pub fn add_layout(&mut self, file: &FileEntry) -> Result<()> {
        let name = file.stem().to_string();
        self.env
            .add_template_owned(name.clone(), file.content.clone())?;
        log::trace!("Compiled {name} template from layout file");
        self.layouts.insert(name);
        Ok(())
    }

    /// names of the compiled layouts
    pub fn layouts(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(String::as_str)
    }

    pub fn has_layout(&self, name: &str) -> bool {
        self.layouts.contains(name)
    }

    /// render the layout `layout` for the page `page` over `ctx`
    pub fn render<S: Serialize>(&self, page: &str, layout: &str, ctx: S) -> Result<String> {
        if !self.has_layout(layout) {
            return Err(Error::LayoutError {
                page: page.into(),
                layout: layout.into(),
            });
        }
        let template = self.env.get_template(layout)?;
        Ok(template.render(ctx)?)
    }
}
