//! Document store: owns the in-memory document and mediates every mutation
//! and the load/save cycle against the GitHub Contents API.
//!
//! Persistence is wholesale: every save serializes all categories and posts
//! and overwrites the remote file. The current blob sha is re-fetched
//! immediately before each write (last-fetch-wins); there is no merge and no
//! retry. A failed save leaves the in-memory document intact.

use chrono::{Local, Utc};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::errors::AppError;
use crate::github::ContentsClient;
use crate::models::{Category, Document, Post, SubCategory};

/// Everything guarded by the single lock. Holding the lock across a save's
/// refetch-then-write sequence keeps local mutations from interleaving with
/// it, matching the original single-threaded control flow.
struct DocState {
    document: Document,
    revision: Option<String>,
    last_id: i64,
}

/// The one stateful service shared by all handlers.
pub struct DocumentStore {
    github: ContentsClient,
    doc_path: String,
    configured: bool,
    state: Mutex<DocState>,
}

impl DocumentStore {
    pub fn new(config: &Config) -> Self {
        Self {
            github: ContentsClient::new(config),
            doc_path: config.doc_path.clone(),
            configured: config.github_configured(),
            state: Mutex::new(DocState {
                document: Document::default(),
                revision: None,
                last_id: 0,
            }),
        }
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::Config(
                "GitHub owner, repo, and token must be configured".to_string(),
            ))
        }
    }

    /// Load the document from the repository, replacing the in-memory state.
    /// A missing file is a first run and yields the default document;
    /// transport and parse failures propagate.
    pub async fn load(&self) -> Result<Document, AppError> {
        self.ensure_configured()?;

        let remote = self.github.fetch_file(&self.doc_path).await?;

        let mut state = self.state.lock().await;
        match (remote.exists, remote.content) {
            (true, Some(bytes)) => {
                let document: Document = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::Internal(format!("Failed to parse remote document: {}", e))
                })?;
                state.last_id = max_document_id(&document);
                state.document = document;
                state.revision = remote.sha;
                tracing::info!(
                    categories = state.document.categories.len(),
                    posts = state.document.posts.len(),
                    "Loaded document from repository"
                );
            }
            _ => {
                tracing::info!("Remote document absent, starting a new database");
                state.document = Document::default();
                state.revision = None;
            }
        }

        Ok(state.document.clone())
    }

    /// Serialize the document and overwrite the remote file, based on a
    /// freshly fetched sha. Called with the state lock held.
    async fn save_locked(&self, state: &mut DocState) -> Result<String, AppError> {
        self.ensure_configured()?;

        // Refresh the revision marker right before writing to narrow the
        // lost-update window. A failed refresh falls back to the cached sha.
        let mut base_sha = state.revision.clone();
        match self.github.fetch_file(&self.doc_path).await {
            Ok(remote) => {
                if remote.sha.is_some() {
                    base_sha = remote.sha;
                }
            }
            Err(e) => {
                tracing::warn!("Revision refresh failed, using cached sha: {}", e);
            }
        }

        let payload = serde_json::to_vec_pretty(&state.document)
            .map_err(|e| AppError::Internal(format!("Failed to serialize document: {}", e)))?;

        let new_sha = self
            .github
            .write_file(&self.doc_path, &payload, base_sha.as_deref())
            .await?;

        state.revision = Some(new_sha.clone());
        tracing::debug!(sha = %new_sha, "Document saved");
        Ok(new_sha)
    }

    /// Manually persist the current document.
    pub async fn sync(&self) -> Result<String, AppError> {
        let mut state = self.state.lock().await;
        self.save_locked(&mut state).await
    }

    /// A snapshot of the current document.
    pub async fn document(&self) -> Document {
        self.state.lock().await.document.clone()
    }

    /// The last-known revision marker, if any.
    pub async fn revision(&self) -> Option<String> {
        self.state.lock().await.revision.clone()
    }

    // ==================== CATEGORY OPERATIONS ====================
    //
    // Category edits are in-memory only; they reach the repository on the
    // next post save or manual sync.

    pub async fn categories(&self) -> Vec<Category> {
        self.state.lock().await.document.categories.clone()
    }

    pub async fn add_root_category(&self, name: &str) -> Result<Category, AppError> {
        let name = valid_name(name)?;
        let mut state = self.state.lock().await;
        let id = next_id(&mut state.last_id);
        Ok(state.document.add_root_category(id, name))
    }

    pub async fn add_sub_category(
        &self,
        parent_id: i64,
        name: &str,
    ) -> Result<SubCategory, AppError> {
        let name = valid_name(name)?;
        let mut state = self.state.lock().await;
        let id = next_id(&mut state.last_id);
        state
            .document
            .add_sub_category(parent_id, id, name)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", parent_id)))
    }

    pub async fn delete_root_category(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        if state.document.delete_root_category(id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Category {} not found", id)))
        }
    }

    pub async fn delete_sub_category(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        if state.document.delete_sub_category(id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Sub-category {} not found", id)))
        }
    }

    /// Swap a child with its neighbor. Out-of-bounds swaps are a no-op and
    /// return false.
    pub async fn reorder_child(
        &self,
        parent_id: i64,
        index: usize,
        offset: isize,
    ) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        state
            .document
            .reorder_child(parent_id, index, offset)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", parent_id)))
    }

    // ==================== POST OPERATIONS ====================
    //
    // Every post mutation triggers an immediate save. The mutation is applied
    // first; if the save fails the edit stays in memory, unpersisted.

    pub async fn posts(&self, category_id: Option<i64>) -> Vec<Post> {
        let state = self.state.lock().await;
        match category_id {
            Some(id) => state.document.posts_in_category(id),
            None => state.document.posts.clone(),
        }
    }

    pub async fn post(&self, id: i64) -> Result<Post, AppError> {
        let state = self.state.lock().await;
        state
            .document
            .post(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    pub async fn create_post(
        &self,
        title: &str,
        content: String,
        category_id: i64,
    ) -> Result<Post, AppError> {
        let title = valid_title(title)?;
        valid_category_id(category_id)?;

        let mut state = self.state.lock().await;
        let post = Post {
            id: next_id(&mut state.last_id),
            title,
            content,
            category_id,
            date: timestamp(),
        };
        state.document.prepend_post(post.clone());

        self.save_locked(&mut state).await?;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: String,
        category_id: i64,
    ) -> Result<Post, AppError> {
        let title = valid_title(title)?;
        valid_category_id(category_id)?;

        let mut state = self.state.lock().await;
        let post = Post {
            id,
            title,
            content,
            category_id,
            date: timestamp(),
        };
        if !state.document.replace_post(post.clone()) {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        self.save_locked(&mut state).await?;
        Ok(post)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        if !state.document.remove_post(id) {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        self.save_locked(&mut state).await?;
        Ok(())
    }
}

/// Millisecond-timestamp ids, bumped past the previous one so rapid creation
/// never collides and ids stay strictly increasing.
fn next_id(last: &mut i64) -> i64 {
    let id = Utc::now().timestamp_millis().max(*last + 1);
    *last = id;
    id
}

/// Seed the id counter from a loaded document so fresh ids never collide
/// with existing ones.
fn max_document_id(document: &Document) -> i64 {
    let category_max = document
        .categories
        .iter()
        .flat_map(|c| std::iter::once(c.id).chain(c.children.iter().map(|s| s.id)))
        .max()
        .unwrap_or(0);
    let post_max = document.posts.iter().map(|p| p.id).max().unwrap_or(0);
    category_max.max(post_max)
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn valid_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

fn valid_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(trimmed.to_string())
}

fn valid_category_id(category_id: i64) -> Result<(), AppError> {
    if category_id <= 0 {
        return Err(AppError::Validation("Category is required".to_string()));
    }
    Ok(())
}
