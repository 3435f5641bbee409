use serde::Serialize;

/// One file of a bundle, path relative to the repository root.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    pub path: &'static str,
    pub content: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub files: &'static [TemplateFile],
    pub required_env_vars: &'static [&'static str],
}

/// Public view of a template: everything except file contents.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub required_env_vars: Vec<String>,
}

impl From<&Template> for TemplateSummary {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            icon: template.icon.to_string(),
            required_env_vars: template
                .required_env_vars
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }
}

const GITIGNORE: &str = "target\n.env\n*.log\n";

pub static BUILTIN_TEMPLATES: &[Template] = &[
    Template {
        id: "claude-assistant",
        name: "Claude AI Assistant",
        description: "Mobile-optimized Claude chatbot",
        icon: "🤖",
        files: &[
            TemplateFile {
                path: "Cargo.toml",
                content: include_str!(
                    "../../bundles/claude-assistant/Cargo.toml.tmpl"
                ),
            },
            TemplateFile {
                path: "src/main.rs",
                content: include_str!("../../../appgen-chat/src/main.rs"),
            },
            TemplateFile {
                path: ".env.example",
                content: "# Export these before starting; nothing loads this file\nANTHROPIC_API_KEY=your_key_here\n",
            },
            TemplateFile {
                path: ".gitignore",
                content: GITIGNORE,
            },
            TemplateFile {
                path: "README.md",
                content: include_str!("../../bundles/claude-assistant/README.md"),
            },
        ],
        required_env_vars: &["ANTHROPIC_API_KEY"],
    },
    Template {
        id: "axum-api",
        name: "Axum REST API",
        description: "Simple Axum REST API starter",
        icon: "🚀",
        files: &[
            TemplateFile {
                path: "Cargo.toml",
                content: include_str!("../../bundles/axum-api/Cargo.toml.tmpl"),
            },
            TemplateFile {
                path: "src/main.rs",
                content: include_str!("../../bundles/axum-api/main.rs.tmpl"),
            },
            TemplateFile {
                path: ".env.example",
                content: "# Export these before starting; nothing loads this file\nPORT=3000\n",
            },
            TemplateFile {
                path: ".gitignore",
                content: GITIGNORE,
            },
            TemplateFile {
                path: "README.md",
                content: include_str!("../../bundles/axum-api/README.md"),
            },
        ],
        required_env_vars: &[],
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TemplateRegistry {
    templates: &'static [Template],
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    pub fn new(templates: &'static [Template]) -> Self {
        Self { templates }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATES)
    }

    pub fn get(&self, id: &str) -> Option<&'static Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn list(&self) -> Vec<TemplateSummary> {
        self.templates.iter().map(TemplateSummary::from).collect()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'static, Template> {
        self.templates.iter()
    }
}
