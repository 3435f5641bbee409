use super::Template;

/// Marker replaced by the caller-supplied application name.
pub const PLACEHOLDER: &str = "{{APP_NAME}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: String,
    pub content: String,
}

/// Substitutes [`PLACEHOLDER`] in every file of `template`, keeping bundle
/// order. The replacement is purely textual: `app_name` is not escaped for
/// the syntax of the file it lands in.
pub fn render(template: &Template, app_name: &str) -> Vec<RenderedFile> {
    template
        .files
        .iter()
        .map(|file| RenderedFile {
            path: file.path.to_string(),
            content: file.content.replace(PLACEHOLDER, app_name),
        })
        .collect()
}

pub fn count_placeholders(content: &str) -> usize {
    content.matches(PLACEHOLDER).count()
}
