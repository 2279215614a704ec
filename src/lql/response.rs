//! Wire model of the remote compilation service
//!
//! Request: `{ "code": "..." }`
//!
//! Response:
//!
//! ```text
//! {
//!   "success": false,
//!   "error_phase": "semantic",
//!   "error": "type mismatch",
//!   "phases": { "tokens": [...], "parser": [...] }
//! }
//! ```
//!
//! Phase artifacts are arbitrary JSON, so they are kept as [serde_json::Value]
//! and only formatted for display by [normalize](super::normalize).

use super::phase::Phase;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /run`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub code: String,
}

impl RunRequest {
    pub fn new(code: impl Into<String>) -> Self {
        RunRequest { code: code.into() }
    }
}

/// Artifacts produced by the phases that ran
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tac: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_tac: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_output: Option<Value>,
}

impl PhaseArtifacts {
    fn slot(&self, phase: Phase) -> &Option<Value> {
        match phase {
            Phase::Lexer => &self.tokens,
            Phase::Parser => &self.parser,
            Phase::Semantic => &self.semantic,
            Phase::Tac => &self.tac,
            Phase::Optimizer => &self.optimized_tac,
            Phase::Execution => &self.execution_output,
        }
    }

    fn slot_mut(&mut self, phase: Phase) -> &mut Option<Value> {
        match phase {
            Phase::Lexer => &mut self.tokens,
            Phase::Parser => &mut self.parser,
            Phase::Semantic => &mut self.semantic,
            Phase::Tac => &mut self.tac,
            Phase::Optimizer => &mut self.optimized_tac,
            Phase::Execution => &mut self.execution_output,
        }
    }

    /// The artifact a phase produced, if any
    pub fn get(&self, phase: Phase) -> Option<&Value> {
        self.slot(phase).as_ref()
    }

    pub fn set(&mut self, phase: Phase, artifact: Value) {
        *self.slot_mut(phase) = Some(artifact);
    }

    /// Builder-style [set](Self::set)
    pub fn with(mut self, phase: Phase, artifact: Value) -> Self {
        self.set(phase, artifact);
        self
    }

    /// Phases that produced an artifact, in pipeline order
    pub fn present(&self) -> Vec<Phase> {
        Phase::ALL
            .into_iter()
            .filter(|phase| self.get(*phase).is_some())
            .collect()
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let mut artifacts = PhaseArtifacts::default();
        for phase in Phase::ALL {
            if let Some(value) = object.get(phase.artifact_field()) {
                if !value.is_null() {
                    artifacts.set(phase, value.clone());
                }
            }
        }
        artifacts
    }
}

/// One pipeline result as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub success: bool,
    pub error_phase: Option<Phase>,
    pub error: Option<String>,
    #[serde(default)]
    pub phases: PhaseArtifacts,
}

/// A response body that is not a JSON object
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed response body: expected a JSON object, found {found}")]
pub struct MalformedResponse {
    pub found: &'static str,
}

impl PipelineResponse {
    /// A successful run with the given artifacts
    pub fn succeeded(phases: PhaseArtifacts) -> Self {
        PipelineResponse {
            success: true,
            error_phase: None,
            error: None,
            phases,
        }
    }

    /// A run that stopped at `phase`
    pub fn failed(phase: Phase, error: impl Into<String>, phases: PhaseArtifacts) -> Self {
        PipelineResponse {
            success: false,
            error_phase: Some(phase),
            error: Some(error.into()),
            phases,
        }
    }

    /// Lenient decoding: any field that cannot be read is treated as absent.
    ///
    /// A missing `success` reads as `false`, an `error_phase` that names no known
    /// phase reads as absent, `null` artifacts read as absent. Only a body that is
    /// not an object at all is rejected.
    pub fn from_value(value: &Value) -> Result<Self, MalformedResponse> {
        let object = value.as_object().ok_or(MalformedResponse {
            found: json_kind(value),
        })?;

        let success = object
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let error_phase = object
            .get("error_phase")
            .and_then(Value::as_str)
            .and_then(|name| name.parse::<Phase>().ok());
        let error = object
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        let phases = object
            .get("phases")
            .and_then(Value::as_object)
            .map(PhaseArtifacts::from_object)
            .unwrap_or_default();

        Ok(PipelineResponse {
            success,
            error_phase,
            error,
            phases,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(RunRequest::new("print x")).unwrap();
        assert_eq!(body, json!({ "code": "print x" }));
    }

    #[test]
    fn test_decode_success() {
        let value = json!({
            "success": true,
            "error": null,
            "error_phase": null,
            "phases": {
                "tokens": ["Token(type='KEYWORD', value='print', line=1, col=1)"],
                "parser": [],
                "semantic": "{'x': 'list'}",
                "tac": ["PRINT x"],
                "optimized_tac": ["PRINT x"],
                "execution_output": "[1, 2]\n"
            }
        });

        let response = PipelineResponse::from_value(&value).unwrap();
        assert!(response.success);
        assert_eq!(response.error_phase, None);
        assert_eq!(response.phases.present(), Phase::ALL.to_vec());
        assert_eq!(
            response.phases.get(Phase::Execution),
            Some(&json!("[1, 2]\n"))
        );
    }

    #[test]
    fn test_decode_failure() {
        let value = json!({
            "success": false,
            "error_phase": "semantic",
            "error": "type mismatch",
            "phases": { "tokens": [], "parser": [] }
        });

        let response = PipelineResponse::from_value(&value).unwrap();
        assert!(!response.success);
        assert_eq!(response.error_phase, Some(Phase::Semantic));
        assert_eq!(response.error.as_deref(), Some("type mismatch"));
        assert_eq!(response.phases.present(), vec![Phase::Lexer, Phase::Parser]);
    }

    #[test]
    fn test_decode_treats_unreadable_fields_as_absent() {
        let value = json!({
            "success": "yes",
            "error_phase": "codegen",
            "error": 42,
            "phases": { "tokens": null, "tac": ["x = 1"], "bogus": 1 }
        });

        let response = PipelineResponse::from_value(&value).unwrap();
        assert!(!response.success);
        assert_eq!(response.error_phase, None);
        assert_eq!(response.error, None);
        assert_eq!(response.phases.present(), vec![Phase::Tac]);
    }

    #[test]
    fn test_decode_empty_object() {
        let response = PipelineResponse::from_value(&json!({})).unwrap();
        assert_eq!(response, PipelineResponse::default());
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        let err = PipelineResponse::from_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.found, "an array");
        assert_eq!(
            err.to_string(),
            "malformed response body: expected a JSON object, found an array"
        );
    }

    #[test]
    fn test_serialize_skips_absent_artifacts() {
        let response = PipelineResponse::failed(
            Phase::Parser,
            "unexpected token",
            PhaseArtifacts::default().with(Phase::Lexer, json!([])),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error_phase": "parser",
                "error": "unexpected token",
                "phases": { "tokens": [] }
            })
        );
    }
}
