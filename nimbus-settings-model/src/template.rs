//! Built-in default settings template.
//!
//! Used whenever no stored settings are available: first run, the backing
//! service answering with the `"defaults"` sentinel, or a stored blob that
//! fails to parse. The template is constructed in code so it can never
//! itself fail to load.

use crate::document::SettingsDocument;

/// Build the default settings document.
pub fn default_template() -> SettingsDocument {
    let mut doc = SettingsDocument::new();

    {
        let root = doc.root_mut();
        root.name = Some("Settings".to_owned());
    }

    doc.ensure_section("/settings", "general", Some("General"))
        .expect("root section exists");
    doc.set_value("/settings/general", "animateui", "true")
        .expect("general section exists");
    doc.set_value("/settings/general", "revealfile", "false")
        .expect("general section exists");

    doc.ensure_section("/settings", "editors", Some("Editors"))
        .expect("root section exists");
    doc.ensure_section("/settings/editors", "code", Some("Code Editor"))
        .expect("editors section exists");
    for (key, value) in [
        ("fontsize", "12"),
        ("tabsize", "4"),
        ("softtabs", "true"),
        ("wrapmode", "false"),
        ("overwrite", "false"),
    ] {
        doc.set_value("/settings/editors/code", key, value)
            .expect("code section exists");
    }

    doc.ensure_section("/settings", "console", Some("Console"))
        .expect("root section exists");
    doc.set_value("/settings/console", "maxlines", "1000")
        .expect("console section exists");

    doc.ensure_section("/settings", "auto", Some("Automation"))
        .expect("root section exists");

    doc
}

/// Canonical serialized form of the default template.
pub fn default_template_text() -> String {
    default_template()
        .to_text()
        .expect("default template serializes")
}
