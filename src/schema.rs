//! Transaction loop schema: declares how segments group into named loops.
//!
//! The schema is a TOML file of nested loop definitions. Each loop names
//! the segment tag that opens a new instance (`start`) and the tags that
//! belong to it (`segments`, which must include `start`):
//!
//! ```toml
//! [[loop]]
//! id = "L0000"
//! start = "AK2"
//! segments = ["AK2", "IK5"]
//!
//!   [[loop.loop]]
//!   id = "L0002"
//!   start = "IK3"
//!   segments = ["IK3", "CTX"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{EdiError, EdiResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TransactionSchema {
    #[serde(rename = "loop", default)]
    pub loops: Vec<LoopDef>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoopDef {
    pub id: String,
    pub start: String,
    #[serde(default)]
    pub segments: Vec<String>,
    #[serde(rename = "loop", default)]
    pub loops: Vec<LoopDef>,
}

impl TransactionSchema {
    pub fn load(path: &Path) -> EdiResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| schema_error(path, e.to_string()))?;
        let schema: TransactionSchema =
            toml::from_str(&content).map_err(|e| schema_error(path, e.to_string()))?;

        for def in &schema.loops {
            validate_def(def).map_err(|reason| schema_error(path, reason))?;
        }

        debug!(path = %path.display(), loops = schema.loops.len(), "schema loaded");
        Ok(schema)
    }
}

fn schema_error(path: &Path, reason: String) -> EdiError {
    EdiError::Schema {
        path: path.to_path_buf(),
        reason,
    }
}

fn validate_def(def: &LoopDef) -> Result<(), String> {
    if def.id.is_empty() {
        return Err("loop id must not be empty".to_string());
    }
    if def.start.is_empty() {
        return Err(format!("loop {} has an empty start segment", def.id));
    }
    if !def.segments.contains(&def.start) {
        return Err(format!(
            "loop {} start segment '{}' is not listed in its segments",
            def.id, def.start
        ));
    }
    for child in &def.loops {
        validate_def(child)?;
    }
    Ok(())
}
