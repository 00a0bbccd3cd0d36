//! Category models for the two-level folder tree.

use serde::{Deserialize, Serialize};

/// A second-level category. Posts reference these by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
}

/// A top-level category holding an ordered list of sub-categories.
///
/// The tree is exactly two levels deep; children never nest further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub children: Vec<SubCategory>,
}

/// Request body for creating a category (top-level or child).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Direction for sibling reordering: -1 moves up, +1 moves down.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "i8")]
pub enum ReorderDirection {
    Up,
    Down,
}

impl ReorderDirection {
    pub fn offset(self) -> isize {
        match self {
            ReorderDirection::Up => -1,
            ReorderDirection::Down => 1,
        }
    }
}

impl TryFrom<i8> for ReorderDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(ReorderDirection::Up),
            1 => Ok(ReorderDirection::Down),
            other => Err(format!("direction must be -1 or 1, got {}", other)),
        }
    }
}

/// Request body for reordering a child within its parent's children.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderChildRequest {
    pub index: usize,
    pub direction: ReorderDirection,
}
