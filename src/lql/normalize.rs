//! Pipeline result normalizer
//!
//! Maps one [PipelineResponse] to what each of the six phase panels shows. The
//! result is rebuilt from scratch for every response; nothing is patched in place,
//! so a previous run can never leak into the panels of the next one.
//!
//! For a failed run exactly one panel holds the error text, the panels before it
//! hold their artifacts and the panels after it are blank. Blank later panels are
//! enforced here even if the service sends artifacts it should not have.
//!
//! A phase that produced an empty string looks the same as a phase that produced
//! nothing. The service has no presence flag per phase, so that cannot be told
//! apart on this side.

use super::phase::Phase;
use super::response::PipelineResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Shown when a failed response carries no usable error text
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// How structured artifacts are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Pretty JSON, two-space indent, keys in received order
    #[default]
    Json,
    Yaml,
}

impl FromStr for ArtifactFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ArtifactFormat::Json),
            "yaml" => Ok(ArtifactFormat::Yaml),
            other => Err(format!(
                "unknown artifact format '{}' (expected 'json' or 'yaml')",
                other
            )),
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Json => f.write_str("json"),
            ArtifactFormat::Yaml => f.write_str("yaml"),
        }
    }
}

/// Display text for every phase panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseDisplayModel {
    entries: [String; 6],
}

impl PhaseDisplayModel {
    pub fn get(&self, phase: Phase) -> &str {
        &self.entries[phase.index()]
    }

    pub fn set(&mut self, phase: Phase, text: impl Into<String>) {
        self.entries[phase.index()] = text.into();
    }

    pub fn clear(&mut self, phase: Phase) {
        self.entries[phase.index()].clear();
    }

    /// Panels in pipeline order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &str)> {
        Phase::ALL
            .into_iter()
            .zip(self.entries.iter().map(String::as_str))
    }

    /// Whether every panel is empty
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(String::is_empty)
    }
}

/// Output of [normalize]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub model: PhaseDisplayModel,
    /// The phase the pipeline stopped at, `None` for a successful run
    pub failing_phase: Option<Phase>,
}

impl Normalized {
    /// Display state for a run whose response never arrived or could not be read.
    ///
    /// Reported as an execution failure so the console is never left without a
    /// verdict.
    pub fn transport_failure(description: impl fmt::Display) -> Self {
        let mut model = PhaseDisplayModel::default();
        model.set(Phase::Execution, format!("Error: {}", description));
        Normalized {
            model,
            failing_phase: Some(Phase::Execution),
        }
    }
}

/// The status line text for a failed run
pub fn failing_phase_banner(phase: Phase) -> String {
    format!("ERROR in {} PHASE", phase)
}

/// Render one artifact for display.
///
/// Strings pass through verbatim, numbers and booleans use their plain text,
/// `null` is empty, arrays and objects are serialized in `format`.
pub fn format_artifact(artifact: &Value, format: ArtifactFormat) -> String {
    match artifact {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => match format {
            ArtifactFormat::Json => pretty_json(artifact),
            ArtifactFormat::Yaml => match serde_yaml::to_string(artifact) {
                Ok(yaml) => yaml.trim_end().to_string(),
                Err(_) => pretty_json(artifact),
            },
        },
    }
}

fn pretty_json(artifact: &Value) -> String {
    serde_json::to_string_pretty(artifact).unwrap_or_else(|_| artifact.to_string())
}

/// Derive the per-phase display model from one response.
///
/// Pure and idempotent. A failed response without a readable `error_phase` is
/// attributed to [Phase::Execution].
pub fn normalize(response: &PipelineResponse, format: ArtifactFormat) -> Normalized {
    let mut model = PhaseDisplayModel::default();
    for phase in Phase::ALL {
        if let Some(artifact) = response.phases.get(phase) {
            model.set(phase, format_artifact(artifact, format));
        }
    }

    if response.success {
        return Normalized {
            model,
            failing_phase: None,
        };
    }

    let failing = response.error_phase.unwrap_or(Phase::Execution);
    let error = response
        .error
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or(UNKNOWN_ERROR);
    model.set(failing, error);
    for later in Phase::ALL.into_iter().filter(|p| p.is_after(failing)) {
        model.clear(later);
    }

    Normalized {
        model,
        failing_phase: Some(failing),
    }
}
