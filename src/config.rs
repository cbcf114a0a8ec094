use std::path::Path;

use anyhow::Context;
use serde::Deserialize;


/// What to do when one form of a loaded source fails to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log the failure and carry on with the next form.
    #[default]
    Skip,
    /// Stop and return the error.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Evaluate the bundled prelude into every new context.
    pub prelude: bool,
    /// Policy for `EvaluationContext::load_file`.
    pub load_errors: OnError,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { prelude: true, load_errors: OnError::Skip }
    }
}

impl InterpreterConfig {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&source)
            .with_context(|| format!("parsing config {}", path.display()))
    }
}
