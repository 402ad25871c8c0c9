use crate::domain::Version;

/// A release tag ready to be written: name plus annotation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub message: String,
}

impl ReleaseTag {
    /// Build the tag for `version`, rendering its message from a template
    pub fn new(version: &Version, project: &str, template: &MessageTemplate) -> Self {
        let name = version.tag_name();
        let message = template.render(project, version, &name);
        ReleaseTag { name, message }
    }

    /// Build the tag for `version` with a message given verbatim
    pub fn with_message(version: &Version, message: impl Into<String>) -> Self {
        ReleaseTag {
            name: version.tag_name(),
            message: message.into(),
        }
    }
}

/// Tag message template (e.g., "{project} {version}")
///
/// Supported placeholders: `{project}`, `{version}` (X.Y.Z) and `{tag}` (vX.Y.Z).
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub template: String,
}

impl MessageTemplate {
    /// Create a new message template
    pub fn new(template: impl Into<String>) -> Self {
        MessageTemplate {
            template: template.into(),
        }
    }

    /// Render the template for one release
    pub fn render(&self, project: &str, version: &Version, tag: &str) -> String {
        self.template
            .replace("{project}", project)
            .replace("{version}", &version.to_string())
            .replace("{tag}", tag)
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        MessageTemplate::new("{project} {version}")
    }
}
