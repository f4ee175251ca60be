//! Editing session service
//!
//! Owns the current material, routes every change through the reducer and
//! performs all-or-nothing file import plus export/preview.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::serializer;
use crate::domain::{Material, Operation};
use crate::infrastructure::traits::FileSystem;

/// Service holding the single material being edited.
pub struct EditorService {
    fs: Arc<dyn FileSystem>,
    indent: usize,
    material: Material,
}

impl EditorService {
    /// Create a new editor service starting from `material`.
    ///
    /// `indent` controls export formatting (0 = compact).
    pub fn new(fs: Arc<dyn FileSystem>, material: Material, indent: usize) -> Self {
        Self {
            fs,
            indent,
            material,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Apply one operation. Returns whether the material changed.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, op: &Operation) -> bool {
        let next = self.material.apply(op);
        let changed = next != self.material;
        self.material = next;
        changed
    }

    /// Replace the whole material with the content of `text`.
    ///
    /// On failure the current material is left untouched.
    pub fn import_text(&mut self, text: &str) -> ApplicationResult<()> {
        let material = serializer::import(text)?;
        let (topics, sub_topics, scenes) = material.counts();
        info!(
            "import: replaced material ({} topics, {} subtopics, {} scenes)",
            topics, sub_topics, scenes
        );
        self.material = material;
        Ok(())
    }

    /// Read `path` and import it; all-or-nothing like [`Self::import_text`].
    #[instrument(level = "debug", skip(self))]
    pub fn import_file(&mut self, path: &Path) -> ApplicationResult<()> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::FileNotFound(path.to_path_buf()));
        }
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read material", path)?;
        self.import_text(&text)
    }

    /// Serialized export of the current material.
    pub fn export_text(&self) -> ApplicationResult<String> {
        Ok(serializer::to_json(&self.material, self.indent)?)
    }

    /// Live preview of what an export would write.
    pub fn preview(&self) -> ApplicationResult<String> {
        self.export_text()
    }

    /// Write the export to `path`. Refuses to replace an existing file unless `overwrite`.
    #[instrument(level = "debug", skip(self))]
    pub fn export_file(&self, path: &Path, overwrite: bool) -> ApplicationResult<()> {
        if !overwrite && self.fs.exists(path) {
            return Err(ApplicationError::AlreadyExists(path.to_path_buf()));
        }
        let mut text = self.export_text()?;
        text.push('\n');
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, &text)
            .with_path_context("write material", path)?;
        debug!("export: wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, Edit};
    use crate::infrastructure::traits::RealFileSystem;

    fn service(material: Material) -> EditorService {
        EditorService::new(Arc::new(RealFileSystem), material, 2)
    }

    #[test]
    fn given_no_op_edit_when_applying_then_reports_unchanged() {
        let mut svc = service(Material::seeded());
        assert!(!svc.apply(&Operation::Topics(Edit::Remove(9))));
        assert!(svc.apply(&Operation::Topics(Edit::Add)));
        assert_eq!(svc.material().topics.len(), 2);
    }

    #[test]
    fn given_schema_error_when_importing_then_material_untouched() {
        let mut svc = service(Material::seeded());
        let before = svc.material().clone();

        let err = svc.import_text(r#"{"foo": 1}"#).unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::MissingTopics)
        ));
        assert_eq!(svc.material(), &before);
    }

    #[test]
    fn given_preview_when_material_changes_then_preview_follows() {
        let mut svc = service(Material::empty());
        assert_eq!(svc.preview().unwrap(), "{\n  \"topics\": []\n}");
        svc.apply(&Operation::Topics(Edit::Add));
        assert!(svc.preview().unwrap().contains("\"subTopics\": []"));
    }
}
