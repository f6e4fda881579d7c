//! The settings document: a serializable tree of sections and keys.
//!
//! A [`SettingsDocument`] is what the settings controller loads from the
//! backing service and what UI pages commit their edits into. Sections are
//! addressed by slash paths rooted at the document's root section, e.g.
//! `/settings/editor`. The persisted text form is JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Tag of the document's root section. Every slash path starts with it.
pub const ROOT_TAG: &str = "settings";

/// A named subtree of the settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section tag used in paths (e.g. `editor`).
    pub tag: String,

    /// Human-readable display name shown by the settings UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Key/value settings stored directly on this section.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,

    /// Child sections, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Section>,
}

impl Section {
    /// Create an empty section with the given tag and optional display name.
    pub fn new(tag: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            tag: tag.into(),
            name: name.map(str::to_owned),
            values: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Look up a direct child section by tag.
    pub fn child(&self, tag: &str) -> Option<&Section> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Mutable variant of [`Section::child`].
    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Section> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// Read a value stored on this section.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value on this section, replacing any previous one.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

/// The structured settings data for one user session.
///
/// The document is exclusively owned by the settings controller for the
/// lifetime of the session; UI code only ever sees references handed out
/// through notifications or commit callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument {
    root: Section,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsDocument {
    /// Create an empty document containing only the root section.
    pub fn new() -> Self {
        Self {
            root: Section::new(ROOT_TAG, None),
        }
    }

    /// Parse a document from its persisted text form.
    ///
    /// # Errors
    /// Returns [`DocumentError::Parse`] for malformed text and
    /// [`DocumentError::UnexpectedRoot`] when the root section is not
    /// tagged [`ROOT_TAG`].
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let doc: SettingsDocument = serde_json::from_str(text).map_err(DocumentError::Parse)?;
        if doc.root.tag != ROOT_TAG {
            return Err(DocumentError::UnexpectedRoot(doc.root.tag));
        }
        Ok(doc)
    }

    /// Serialize the document to its persisted text form.
    pub fn to_text(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Serialize)
    }

    /// The root section.
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Mutable access to the root section.
    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    /// Resolve a slash path (`/settings/editor`) to a section.
    pub fn section(&self, path: &str) -> Option<&Section> {
        let mut steps = path.split('/').filter(|s| !s.is_empty());
        if steps.next() != Some(self.root.tag.as_str()) {
            return None;
        }
        steps.try_fold(&self.root, |section, tag| section.child(tag))
    }

    /// Mutable variant of [`SettingsDocument::section`].
    pub fn section_mut(&mut self, path: &str) -> Option<&mut Section> {
        let mut steps = path.split('/').filter(|s| !s.is_empty());
        if steps.next() != Some(self.root.tag.as_str()) {
            return None;
        }
        steps.try_fold(&mut self.root, |section, tag| section.child_mut(tag))
    }

    /// Ensure a child section with the given tag exists under `path_prefix`.
    ///
    /// Idempotent: returns `Ok(true)` if the section was created, `Ok(false)`
    /// if it already existed. The display name is only applied on creation;
    /// an existing section keeps its name.
    ///
    /// # Errors
    /// Returns [`DocumentError::MissingSection`] when `path_prefix` does not
    /// resolve to an existing section.
    pub fn ensure_section(
        &mut self,
        path_prefix: &str,
        tag: &str,
        name: Option<&str>,
    ) -> Result<bool, DocumentError> {
        let parent = self
            .section_mut(path_prefix)
            .ok_or_else(|| DocumentError::MissingSection(path_prefix.to_owned()))?;
        if parent.child(tag).is_some() {
            return Ok(false);
        }
        parent.children.push(Section::new(tag, name));
        Ok(true)
    }

    /// Read a value stored on the section at `path`.
    pub fn value(&self, path: &str, key: &str) -> Option<&str> {
        self.section(path)?.value(key)
    }

    /// Set a value on the section at `path`.
    ///
    /// # Errors
    /// Returns [`DocumentError::MissingSection`] when `path` does not resolve.
    pub fn set_value(
        &mut self,
        path: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let section = self
            .section_mut(path)
            .ok_or_else(|| DocumentError::MissingSection(path.to_owned()))?;
        section.set_value(key, value);
        Ok(())
    }
}
