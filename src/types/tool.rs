//! Assistant tool definitions and tool resources.

use serde::{Deserialize, Serialize};

/// Tool enabled on an assistant or a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantTool {
    CodeInterpreter,
    FileSearch,
    Function { function: FunctionDefinition },
}

impl AssistantTool {
    /// Parse the declarative form: a tool type plus, for functions, a JSON
    /// function definition.
    pub fn from_declaration(kind: &str, function_definition: Option<&str>) -> crate::Result<Self> {
        match kind {
            "code_interpreter" => Ok(Self::CodeInterpreter),
            "file_search" | "retrieval" => Ok(Self::FileSearch),
            "function" => {
                let raw = function_definition.ok_or_else(|| {
                    crate::Error::validation_with_context(
                        "function tools require a function definition",
                        crate::ErrorContext::new()
                            .with_field_path("tools.function_definition")
                            .with_source("assistant_tool"),
                    )
                })?;
                let function: FunctionDefinition = serde_json::from_str(raw)?;
                Ok(Self::Function { function })
            }
            other => Err(crate::Error::validation_with_context(
                format!("unsupported tool type: {}", other),
                crate::ErrorContext::new()
                    .with_field_path("tools.type")
                    .with_details("expected code_interpreter, file_search or function")
                    .with_source("assistant_tool"),
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::CodeInterpreter => "code_interpreter",
            Self::FileSearch => "file_search",
            Self::Function { .. } => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>, // JSON Schema
}

/// Files and vector stores made available to tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<CodeInterpreterResources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

impl ToolResources {
    /// `None` when both lists are empty, so the field is left out of the request.
    pub fn from_ids(file_ids: &[String], vector_store_ids: &[String]) -> Option<Self> {
        if file_ids.is_empty() && vector_store_ids.is_empty() {
            return None;
        }
        Some(Self {
            code_interpreter: (!file_ids.is_empty()).then(|| CodeInterpreterResources {
                file_ids: file_ids.to_vec(),
            }),
            file_search: (!vector_store_ids.is_empty()).then(|| FileSearchResources {
                vector_store_ids: vector_store_ids.to_vec(),
            }),
        })
    }

    /// Split into `(file_ids, vector_store_ids)`.
    pub fn into_ids(self) -> (Vec<String>, Vec<String>) {
        (
            self.code_interpreter.map(|c| c.file_ids).unwrap_or_default(),
            self.file_search
                .map(|f| f.vector_store_ids)
                .unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeInterpreterResources {
    #[serde(default)]
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSearchResources {
    #[serde(default)]
    pub vector_store_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_wire_format() {
        let tools = vec![
            AssistantTool::CodeInterpreter,
            AssistantTool::Function {
                function: FunctionDefinition {
                    name: "lookup".into(),
                    description: None,
                    parameters: Some(serde_json::json!({"type": "object"})),
                },
            },
        ];
        let json = serde_json::to_value(&tools).unwrap();
        assert_eq!(json[0], serde_json::json!({"type": "code_interpreter"}));
        assert_eq!(json[1]["type"], "function");
        assert_eq!(json[1]["function"]["name"], "lookup");
        assert!(json[1]["function"].get("description").is_none());
    }

    #[test]
    fn test_from_declaration() {
        assert_eq!(
            AssistantTool::from_declaration("retrieval", None).unwrap(),
            AssistantTool::FileSearch
        );
        let f = AssistantTool::from_declaration(
            "function",
            Some(r#"{"name":"get_weather","parameters":{"type":"object"}}"#),
        )
        .unwrap();
        assert_eq!(f.kind(), "function");
        assert!(AssistantTool::from_declaration("function", None).is_err());
        assert!(AssistantTool::from_declaration("browser", None).is_err());
    }
}
