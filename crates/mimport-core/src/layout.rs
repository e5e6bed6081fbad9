//! Destination layout table: keyword-to-folder classification for files that
//! do not carry an explicit relative path.

use serde::{Deserialize, Serialize};

/// Folder used when no rule matches.
pub const DEFAULT_FOLDER: &str = "checkpoints";

/// Built-in rules, tested in this order.
const BUILTIN_RULES: &[(&str, &[&str])] = &[
    ("checkpoints", &["ckpt", "safetensors", "pt"]),
    ("vae", &["vae"]),
    ("diffusers", &["diffusers", "diffuser"]),
    ("embeddings", &["embeddings", "bin"]),
    ("clip", &["clip"]),
    ("upscale_models", &["upscale", "realesrgan"]),
];

/// One folder and the name substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRule {
    pub folder: String,
    pub keywords: Vec<String>,
}

/// Ordered, immutable classification table. Built once at startup.
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    rules: Vec<LayoutRule>,
    default_folder: String,
}

impl DestinationLayout {
    /// Table from explicit rules. Keywords are lowercased so matching is
    /// case-insensitive on both sides.
    pub fn new(rules: Vec<LayoutRule>, default_folder: &str) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| LayoutRule {
                folder: r.folder,
                keywords: r.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self {
            rules,
            default_folder: default_folder.to_string(),
        }
    }

    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(folder, keywords)| LayoutRule {
                folder: folder.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        Self::new(rules, DEFAULT_FOLDER)
    }

    pub fn with_default_folder(mut self, folder: &str) -> Self {
        self.default_folder = folder.to_string();
        self
    }

    pub fn rules(&self) -> &[LayoutRule] {
        &self.rules
    }

    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Folder for `file_name`: the first rule (in table order) with a keyword
    /// contained in the lowercased name, else the default folder.
    ///
    /// Matching is plain substring containment, so `"model.pth"` lands in
    /// `checkpoints` through `"pt"` before any later rule is consulted.
    pub fn classify(&self, file_name: &str) -> &str {
        let name = file_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| name.contains(kw.as_str())))
            .map(|rule| rule.folder.as_str())
            .unwrap_or(&self.default_folder)
    }
}

impl Default for DestinationLayout {
    fn default() -> Self {
        Self::builtin()
    }
}
