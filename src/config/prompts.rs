//! Prompt templates for Speil.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub analysis: AnalysisPrompts,
    pub transform: TransformPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for deriving a style profile from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPrompts {
    pub system: String,
    /// Receives `{{sample}}`.
    pub user: String,
}

impl Default for AnalysisPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a linguistic analyst specialized in identifying unique speech and writing patterns.
Analyze the provided text and identify the key characteristics of the speaker's language style including:

1. Vocabulary choices (formality level, specialized terms, favorite words/phrases)
2. Sentence structure (length, complexity, active/passive voice preference)
3. Rhetorical devices (metaphors, similes, analogies, etc.)
4. Tone and sentiment (professional, casual, optimistic, critical, etc.)
5. Speech patterns (filler words, pauses, repetition)
6. Unique expressions or catchphrases
7. Grammar and syntax patterns
8. Cultural or regional language markers

Provide a comprehensive style guide that could be used to mimic this person's language style convincingly."#
                .to_string(),

            user: "Analyze the following text:\n\n{{sample}}".to_string(),
        }
    }
}

/// Prompts for rewriting text in a stored style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformPrompts {
    /// Receives `{{style_guide}}`.
    pub system: String,
    /// Receives `{{text}}`.
    pub user: String,
}

impl Default for TransformPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert in linguistic style transfer. Your task is to rewrite the provided text
to match a specific language style that will be described to you.

Here is the style guide to follow:

{{style_guide}}

Rewrite the text to match this style perfectly while preserving the original meaning completely.
Don't add any comments or explanations - just provide the rewritten text."#
                .to_string(),

            user: "Rewrite this text in the described style:\n\n{{text}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let analysis_path = custom_path.join("analysis.toml");
            if analysis_path.exists() {
                let content = std::fs::read_to_string(&analysis_path)?;
                prompts.analysis = toml::from_str(&content)?;
            }

            let transform_path = custom_path.join("transform.toml");
            if transform_path.exists() {
                let content = std::fs::read_to_string(&transform_path)?;
                prompts.transform = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is single-pass: placeholders that appear inside a
    /// substituted value are left alone, so transcripts and style guides
    /// containing `{{...}}` pass through verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => match vars.get(&after[..end]) {
                    Some(value) => {
                        result.push_str(value);
                        rest = &after[end + 2..];
                    }
                    None => {
                        result.push_str("{{");
                        rest = after;
                    }
                },
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.analysis.system.contains("8. Cultural or regional language markers"));
        assert!(prompts.transform.system.contains("{{style_guide}}"));
        assert!(prompts.transform.user.contains("{{text}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_inside_values() {
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), "say {{text}} and {{other}}".to_string());

        let result = Prompts::render("<{{text}}> {{unknown}}", &vars);
        assert_eq!(result, "<say {{text}} and {{other}}> {{unknown}}");
    }

    #[test]
    fn test_custom_variables_are_overridden() {
        let mut custom = HashMap::new();
        custom.insert("persona".to_string(), "pirate".to_string());
        custom.insert("text".to_string(), "from config".to_string());

        let prompts = Prompts::load(None, Some(&custom)).unwrap();
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), "from call".to_string());

        let result = prompts.render_with_custom("{{persona}}: {{text}}", &vars);
        assert_eq!(result, "pirate: from call");
    }

    #[test]
    fn test_load_custom_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("transform.toml"),
            "system = \"Guide: {{style_guide}}\"\nuser = \"{{text}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.transform.system, "Guide: {{style_guide}}");
        assert_eq!(prompts.transform.user, "{{text}}");
        assert_eq!(prompts.analysis.user, AnalysisPrompts::default().user);
    }
}
