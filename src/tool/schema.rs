//! JSON Schema published for the tool's input.

use serde_json::{Value, json};

/// Input schema for `gitlab_get_mr_comments`.
#[must_use]
pub fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project": {
                "type": "string",
                "minLength": 1,
                "description": "Project path (e.g. 'group/subgroup/project') or numeric project id"
            },
            "mr": {
                "oneOf": [
                    { "type": "integer", "minimum": 1 },
                    { "type": "string", "pattern": "^[0-9]+$" }
                ],
                "description": "Merge request IID as shown in the GitLab UI (e.g. 123 for !123)"
            },
            "includeSystem": {
                "type": "boolean",
                "default": false,
                "description": "Include automated system notes such as label or pipeline events"
            },
            "includeOverviewNotes": {
                "type": "boolean",
                "default": true,
                "description": "Also fetch standalone notes from the merge request overview"
            },
            "onlyResolved": {
                "type": "boolean",
                "default": false,
                "description": "Keep only resolvable comments that are resolved"
            },
            "onlyUnresolved": {
                "type": "boolean",
                "default": false,
                "description": "Keep only resolvable comments that are not yet resolved"
            },
            "perPage": {
                "type": "integer",
                "minimum": 1,
                "maximum": 100,
                "default": 100,
                "description": "Page size used when walking GitLab collections"
            },
            "format": {
                "type": "string",
                "enum": ["structured", "digest", "json", "markdown"],
                "default": "structured",
                "description": "'structured' returns JSON; 'digest' returns a Markdown summary"
            }
        },
        "required": ["project", "mr"],
        "additionalProperties": true
    })
}
