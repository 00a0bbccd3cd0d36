//! Post model and request bodies.

use serde::{de, Deserialize, Deserializer, Serialize};

/// A single post. `content` is the rich-text editor's serialized markup,
/// carried as an opaque string and never parsed server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// References a sub-category id. Dangling references are tolerated;
    /// filtering by a deleted category simply yields no matches.
    #[serde(deserialize_with = "lenient_id")]
    pub category_id: i64,
    /// Human-readable timestamp set at save time, never recomputed.
    pub date: String,
}

/// Documents written by the browser editor carry `categoryId` as a string
/// (it came straight from a form select), so accept both forms when reading
/// an existing file. Serialization always emits a number.
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category_id: i64,
}

/// Request body for updating an existing post. All fields are replaced,
/// matching the editor's save semantics (the form always submits the full
/// post, not a patch).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category_id: i64,
}
