//! # Insertion strategies
//!
//! Each mode performs exactly one tree mutation.
//!
//! | Mode            | Anchor                       | Requires              |
//! |-----------------|------------------------------|-----------------------|
//! | `append`        | last child of target         |                       |
//! | `before`        | before reference in target   | reference             |
//! | `replace`       | position of reference        | reference             |
//! | `beforeSibling` | previous sibling of target   | target has a parent   |
//! | `afterSibling`  | next sibling of target       | target has a parent   |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tessera_dom::{Document, NodeId};
use tracing::trace;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertionMode {
    #[default]
    Append,
    Before,
    Replace,
    BeforeSibling,
    AfterSibling,
}

impl InsertionMode {
    pub const ALL: [InsertionMode; 5] = [
        InsertionMode::Append,
        InsertionMode::Before,
        InsertionMode::Replace,
        InsertionMode::BeforeSibling,
        InsertionMode::AfterSibling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InsertionMode::Append => "append",
            InsertionMode::Before => "before",
            InsertionMode::Replace => "replace",
            InsertionMode::BeforeSibling => "beforeSibling",
            InsertionMode::AfterSibling => "afterSibling",
        }
    }
}

impl fmt::Display for InsertionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsertionMode {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        InsertionMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| EngineError::InvalidMode(s.to_string()))
    }
}

/// Place `node` relative to `target` according to `mode`.
///
/// For the sibling modes `target` is the anchor itself and `reference` is
/// ignored.
pub fn insert(
    document: &Document,
    node: NodeId,
    target: NodeId,
    mode: InsertionMode,
    reference: Option<NodeId>,
) -> EngineResult<()> {
    trace!(%node, %target, %mode, "Inserting node");
    match mode {
        InsertionMode::Append => document.append_child(target, node)?,
        InsertionMode::Before => {
            let reference = reference.ok_or_else(|| EngineError::MissingReference(mode.to_string()))?;
            document.insert_before(target, node, Some(reference))?;
        }
        InsertionMode::Replace => {
            let reference = reference.ok_or_else(|| EngineError::MissingReference(mode.to_string()))?;
            document.replace_child(target, node, reference)?;
        }
        InsertionMode::BeforeSibling => {
            let parent = document
                .parent(target)
                .ok_or_else(|| EngineError::NoParent(mode.to_string()))?;
            document.insert_before(parent, node, Some(target))?;
        }
        InsertionMode::AfterSibling => {
            let parent = document
                .parent(target)
                .ok_or_else(|| EngineError::NoParent(mode.to_string()))?;
            let next = document.next_sibling(target);
            document.insert_before(parent, node, next)?;
        }
    }
    Ok(())
}
