//! Template CRUD over the global template store.

use crate::config::{ConfigStore, Template, TemplatesFile};
use crate::error::{PynstalError, Result};

/// Split command-line words on whitespace, so `"flask gunicorn"` and
/// `flask gunicorn` produce the same list.
pub fn split_words<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words
        .iter()
        .flat_map(|w| w.as_ref().split_whitespace())
        .map(str::to_string)
        .collect()
}

/// Manages the template store for one invocation.
///
/// Package and argument order is preserved by every operation. Mutations
/// are written back immediately; failed ones write nothing.
#[derive(Debug)]
pub struct TemplateManager {
    store: ConfigStore,
    file: TemplatesFile,
}

impl TemplateManager {
    /// Load the template store.
    pub fn load(store: ConfigStore) -> Result<Self> {
        let file = store.load_templates()?;
        Ok(Self { store, file })
    }

    /// Create a template. Fails on a taken name or an empty package list.
    pub fn create(&mut self, name: &str, packages: Vec<String>, args: Vec<String>) -> Result<&Template> {
        let name = validate_name(name)?;
        if self.file.templates.contains_key(name) {
            return Err(PynstalError::DuplicateTemplate {
                name: name.to_string(),
            });
        }
        if packages.is_empty() {
            return Err(PynstalError::EmptyTemplate {
                name: name.to_string(),
            });
        }

        self.file
            .templates
            .insert(name.to_string(), Template::new(packages, args));
        self.save()?;
        self.show(name)
    }

    /// Append packages to the end of a template's list.
    pub fn add_packages(&mut self, name: &str, packages: Vec<String>) -> Result<&Template> {
        self.add_packages_with_args(name, packages, Vec::new())
    }

    /// Append packages and installer arguments, keeping existing ones.
    pub fn add_packages_with_args(
        &mut self,
        name: &str,
        packages: Vec<String>,
        args: Vec<String>,
    ) -> Result<&Template> {
        let template = self.get_mut(name)?;
        template.packages.extend(packages);
        template.args.extend(args);
        self.save()?;
        self.show(name)
    }

    /// Remove every occurrence of the given packages.
    ///
    /// Packages that are not present are ignored. Emptying the template is
    /// refused unless `allow_empty` is set.
    pub fn remove_packages(
        &mut self,
        name: &str,
        packages: &[String],
        allow_empty: bool,
    ) -> Result<&Template> {
        let template = self.get_mut(name)?;
        let remaining: Vec<String> = template
            .packages
            .iter()
            .filter(|p| !packages.contains(p))
            .cloned()
            .collect();

        if remaining.len() == template.packages.len() {
            return self.show(name);
        }
        if remaining.is_empty() && !allow_empty {
            return Err(PynstalError::EmptyTemplate {
                name: name.to_string(),
            });
        }

        template.packages = remaining;
        self.save()?;
        self.show(name)
    }

    /// Delete a template.
    pub fn remove(&mut self, name: &str) -> Result<Template> {
        let template = self
            .file
            .templates
            .remove(name)
            .ok_or_else(|| not_found(name))?;
        self.save()?;
        Ok(template)
    }

    /// Look up a template.
    pub fn show(&self, name: &str) -> Result<&Template> {
        self.file.templates.get(name).ok_or_else(|| not_found(name))
    }

    /// All templates, sorted by name.
    pub fn list(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.file.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.file.templates.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Template> {
        self.file
            .templates
            .get_mut(name)
            .ok_or_else(|| not_found(name))
    }

    fn save(&self) -> Result<()> {
        self.store.save_templates(&self.file)
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PynstalError::Other(anyhow::anyhow!(
            "Template name must not be blank"
        )));
    }
    Ok(trimmed)
}

fn not_found(name: &str) -> PynstalError {
    PynstalError::TemplateNotFound {
        name: name.to_string(),
    }
}
