//! MCP tool and resource definitions for Speil.

use super::protocol::{ResourceTemplate, Tool};
use serde_json::json;

/// URI scheme of stored style resources.
pub const STYLE_URI_PREFIX: &str = "style://";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "analyze_youtube_style".to_string(),
            description: "Analyze the speaking/writing style of a person in a YouTube video. \
                Fetches the transcript, produces a style guide and saves it under the video ID \
                for later use with mirror_style."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "YouTube video URL or ID"
                    },
                    "lang": {
                        "type": "string",
                        "description": "Language code for the transcript (defaults to the server's default language)"
                    }
                },
                "required": ["url"]
            }),
        },
        Tool {
            name: "mirror_style".to_string(),
            description: "Rewrite text to match a previously analyzed or saved language style."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The text to transform"
                    },
                    "style_id": {
                        "type": "string",
                        "description": "ID of the style (YouTube video ID or custom name)"
                    }
                },
                "required": ["text", "style_id"]
            }),
        },
        Tool {
            name: "save_style".to_string(),
            description: "Save a custom style description under a chosen ID. \
                Overwrites any existing style with the same ID."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "style_id": {
                        "type": "string",
                        "description": "Custom ID to save the style as"
                    },
                    "description": {
                        "type": "string",
                        "description": "Detailed description of the language style"
                    }
                },
                "required": ["style_id", "description"]
            }),
        },
        Tool {
            name: "list_saved_styles".to_string(),
            description: "List the IDs of all saved language styles.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}

/// Get all resource templates.
pub fn get_resource_templates() -> Vec<ResourceTemplate> {
    vec![ResourceTemplate {
        uri_template: format!("{}{{style_id}}", STYLE_URI_PREFIX),
        name: "Style analysis".to_string(),
        description: "The saved analysis for a specific style.".to_string(),
        mime_type: "text/plain".to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_unique() {
        let tools = get_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_resource_template_uri() {
        let templates = get_resource_templates();
        assert_eq!(templates[0].uri_template, "style://{style_id}");
    }
}
