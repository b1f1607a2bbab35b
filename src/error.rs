//! Error kinds surfaced by the ingestion pipeline.
//!
//! Only [`PipelineError`] ever escapes the pipeline. [`SheetError`] values
//! are recorded against the sheet that produced them and loading moves on.

use serde::Serialize;
use thiserror::Error;

use crate::schema::Role;

/// Fatal failure: nothing can be computed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("workbook '{path}' could not be opened: {reason}")]
    FileUnreadable { path: String, reason: String },
}

/// Reason a single sheet contributed no rows.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SheetError {
    #[error("sheet '{sheet}' could not be read: {reason}")]
    SheetUnreadable { sheet: String, reason: String },

    #[error("sheet '{sheet}' has no column for required roles {missing:?}")]
    SchemaIncomplete { sheet: String, missing: Vec<Role> },
}

impl SheetError {
    pub fn sheet(&self) -> &str {
        match self {
            SheetError::SheetUnreadable { sheet, .. } | SheetError::SchemaIncomplete { sheet, .. } => {
                sheet
            }
        }
    }
}
