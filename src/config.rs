use serde::{Deserialize, Serialize};

use crate::state::Position;

/// Fixed datum used when the program selects a work offset.
pub const DEFAULT_WORK_OFFSET: Position = Position::new(10.0, 10.0, 10.0);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InterpreterConfig {
    pub work_offset_label: String,
    pub work_offset_datum: Position,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            work_offset_label: "G54".to_string(),
            work_offset_datum: DEFAULT_WORK_OFFSET,
        }
    }
}

impl InterpreterConfig {
    pub fn with_work_offset(label: impl Into<String>, datum: Position) -> Self {
        Self { work_offset_label: label.into(), work_offset_datum: datum }
    }
}
