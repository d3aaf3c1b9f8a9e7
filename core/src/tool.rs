//! Adapter exposing search as a function tool for assistant APIs.
//!
//! Assistants that support function calling send back `{id, function:
//! {name, arguments}}` calls and expect `{tool_call_id, output}` pairs in
//! return. `SearchTool` declares the `aivene_search` function, answers calls
//! to it with the plain-text search result, and `RunStatus` tells a polling
//! caller when a run needs attention.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::Aivene;
use crate::error::{Error, Result};
use crate::types::{Search, SearchOptions};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchToolParameters {
    #[schemars(
        description = "The search query to use. For example: 'Latest news on Nvidia stock performance'"
    )]
    pub query: String,
}

/// The `aivene_search` function tool.
#[derive(Debug, Clone)]
pub struct SearchTool {
    aivene: Aivene,
    options: SearchOptions,
    parameter_schema: Value,
}

impl SearchTool {
    pub const NAME: &'static str = "aivene_search";

    pub fn new(aivene: Aivene) -> Self {
        let mut parameter_schema = schema_for!(SearchToolParameters).to_value();
        if let Some(schema) = parameter_schema.as_object_mut() {
            schema.remove("$schema");
        }
        Self {
            aivene,
            options: SearchOptions::default(),
            parameter_schema,
        }
    }

    /// Search options applied to every call.
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        Self::NAME
    }

    pub fn description(&self) -> &str {
        "Get information on recent events from the web."
    }

    pub fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    /// The declaration to register with the assistant.
    pub fn definition(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameter_schema,
            }
        })
    }

    /// Run one call. `arguments` is the JSON-encoded argument object the
    /// assistant produced; the result is the response body as text.
    pub fn call(&self, arguments: &str) -> Result<String> {
        let params: SearchToolParameters = serde_json::from_str(arguments)
            .map_err(|e| Error::ToolArguments(e.to_string()))?;
        let search = Search::new(params.query).with_options(self.options.clone());
        let response = self.aivene.search(&search)?;
        Ok(response.body)
    }

    /// Answer every call addressed to this tool.
    ///
    /// Calls to other functions are skipped, as are calls that produce an
    /// empty body. A failed search is reported to the assistant as the error
    /// message so the run can continue.
    pub fn handle_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolOutput> {
        calls
            .iter()
            .filter_map(|call| {
                if call.function.name != Self::NAME {
                    debug!(name = %call.function.name, "skipping call to unknown tool");
                    return None;
                }
                let output = match self.call(&call.function.arguments) {
                    Ok(body) => body,
                    Err(err) => {
                        warn!(tool_call_id = %call.id, error = %err, "search tool failed");
                        format!("error: {err}")
                    }
                };
                if output.is_empty() {
                    return None;
                }
                Some(ToolOutput {
                    tool_call_id: call.id.clone(),
                    output,
                })
            })
            .collect()
    }
}

/// A function call requested by an assistant run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

/// The answer to a [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

/// Lifecycle state of an assistant run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Whether a poll loop should stop waiting on this run.
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }

    pub fn requires_action(self) -> bool {
        self == RunStatus::RequiresAction
    }
}
