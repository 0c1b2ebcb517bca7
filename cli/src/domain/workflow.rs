//! CI workflow document editing.
//!
//! The workflow is parsed into an order-preserving `serde_yaml::Value` tree,
//! one string is pushed onto the matrix list, and the whole tree is
//! serialized back. Pure functions only; file access lives in `infra::fs`.

use serde_yaml::Value;

use crate::domain::error::WorkflowError;

/// Location of the harness list inside the workflow document:
/// `jobs.<job>.strategy.matrix.<list_key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTarget {
    pub job: String,
    pub list_key: String,
}

impl Default for WorkflowTarget {
    fn default() -> Self {
        Self {
            job: "mayhem".to_string(),
            list_key: "mayhemfile".to_string(),
        }
    }
}

impl WorkflowTarget {
    fn path(&self) -> [&str; 5] {
        ["jobs", &self.job, "strategy", "matrix", &self.list_key]
    }

    /// Dotted form of the key path, used in manual-edit instructions.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.path().join(".")
    }
}

/// Workflow path entry for a harness Mayhemfile.
#[must_use]
pub fn mayhemfile_entry(harness: &str) -> String {
    format!("fuzz/mayhemfiles/Mayhemfile_{harness}")
}

/// Appends `entry` to the target list and returns the rewritten document.
///
/// # Errors
///
/// Returns [`WorkflowError::Parse`] if `source` is not valid YAML,
/// [`WorkflowError::Path`] if a key on the path is missing, and
/// [`WorkflowError::NotASequence`] if the final node is not a list.
pub fn append_entry(
    source: &str,
    target: &WorkflowTarget,
    entry: &str,
) -> Result<String, WorkflowError> {
    let mut doc: Value =
        serde_yaml::from_str(source).map_err(|e| WorkflowError::Parse(e.to_string()))?;

    let list = navigate_mut(&mut doc, target)?;
    list.push(Value::String(entry.to_string()));

    serde_yaml::to_string(&doc).map_err(|e| WorkflowError::Parse(e.to_string()))
}

/// Returns the string entries currently in the target list.
///
/// # Errors
///
/// Same conditions as [`append_entry`].
pub fn entries(source: &str, target: &WorkflowTarget) -> Result<Vec<String>, WorkflowError> {
    let mut doc: Value =
        serde_yaml::from_str(source).map_err(|e| WorkflowError::Parse(e.to_string()))?;
    let list = navigate_mut(&mut doc, target)?;
    Ok(list
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect())
}

fn navigate_mut<'a>(
    doc: &'a mut Value,
    target: &WorkflowTarget,
) -> Result<&'a mut Vec<Value>, WorkflowError> {
    let mut node = doc;
    for key in target.path() {
        node = node.get_mut(key).ok_or_else(|| WorkflowError::Path {
            key: key.to_string(),
        })?;
    }
    // `mayhemfile:` with no value parses as null; treat it as an empty list.
    if node.is_null() {
        *node = Value::Sequence(Vec::new());
    }
    node.as_sequence_mut()
        .ok_or_else(|| WorkflowError::NotASequence {
            key: target.list_key.clone(),
        })
}
