//! The document aggregate: all categories and posts, persisted as one file.

use serde::{Deserialize, Serialize};

use super::{Category, Post, SubCategory};

/// The root document containing all application data.
///
/// This is exactly the JSON written to the repository; the revision marker
/// is tracked beside it by the store and never serialized into the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub categories: Vec<Category>,
    pub posts: Vec<Post>,
}

impl Default for Document {
    /// The first-run document: one default category, no posts.
    fn default() -> Self {
        Self {
            categories: vec![Category {
                id: 1,
                name: "일상".to_string(),
                children: Vec::new(),
            }],
            posts: Vec::new(),
        }
    }
}

impl Document {
    /// Append a new top-level category.
    pub fn add_root_category(&mut self, id: i64, name: String) -> Category {
        let category = Category {
            id,
            name,
            children: Vec::new(),
        };
        self.categories.push(category.clone());
        category
    }

    /// Append a sub-category under the given parent. Returns `None` if the
    /// parent does not exist.
    pub fn add_sub_category(
        &mut self,
        parent_id: i64,
        id: i64,
        name: String,
    ) -> Option<SubCategory> {
        let parent = self.categories.iter_mut().find(|c| c.id == parent_id)?;
        let sub = SubCategory { id, name };
        parent.children.push(sub.clone());
        Some(sub)
    }

    /// Remove a top-level category by id. Posts referencing its children are
    /// left untouched. Returns whether anything was removed.
    pub fn delete_root_category(&mut self, id: i64) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        self.categories.len() != before
    }

    /// Remove a sub-category by id from every parent's children. Posts
    /// referencing it keep their (now dangling) category id.
    pub fn delete_sub_category(&mut self, id: i64) -> bool {
        let mut removed = false;
        for parent in &mut self.categories {
            let before = parent.children.len();
            parent.children.retain(|c| c.id != id);
            removed |= parent.children.len() != before;
        }
        removed
    }

    /// Swap the child at `index` with its neighbor at `index + offset` within
    /// the given parent. An out-of-bounds swap is a no-op. Returns `None` if
    /// the parent does not exist, otherwise whether a swap happened.
    pub fn reorder_child(&mut self, parent_id: i64, index: usize, offset: isize) -> Option<bool> {
        let parent = self.categories.iter_mut().find(|c| c.id == parent_id)?;
        let siblings = &mut parent.children;
        if index >= siblings.len() {
            return Some(false);
        }

        let target = match (index as isize).checked_add(offset) {
            Some(t) if t >= 0 && (t as usize) < siblings.len() => t as usize,
            _ => return Some(false),
        };
        siblings.swap(index, target);
        Some(true)
    }

    /// Look up a post by id.
    pub fn post(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Prepend a post (newest-first display order).
    pub fn prepend_post(&mut self, post: Post) {
        self.posts.insert(0, post);
    }

    /// Replace the post with the same id in place. Returns whether a post
    /// with that id existed.
    pub fn replace_post(&mut self, post: Post) -> bool {
        match self.posts.iter().position(|p| p.id == post.id) {
            Some(idx) => {
                self.posts[idx] = post;
                true
            }
            None => false,
        }
    }

    /// Remove a post by id. Returns whether anything was removed.
    pub fn remove_post(&mut self, id: i64) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != id);
        self.posts.len() != before
    }

    /// Posts whose category id matches, preserving original relative order.
    pub fn posts_in_category(&self, category_id: i64) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_children(ids: &[i64]) -> Document {
        let mut doc = Document::default();
        for &id in ids {
            doc.add_sub_category(1, id, format!("sub-{}", id)).unwrap();
        }
        doc
    }

    fn post(id: i64, category_id: i64) -> Post {
        Post {
            id,
            title: format!("post {}", id),
            content: String::new(),
            category_id,
            date: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_default_document() {
        let doc = Document::default();
        assert_eq!(doc.categories.len(), 1);
        assert_eq!(doc.categories[0].id, 1);
        assert_eq!(doc.categories[0].name, "일상");
        assert!(doc.categories[0].children.is_empty());
        assert!(doc.posts.is_empty());
    }

    #[test]
    fn test_add_sub_category_missing_parent() {
        let mut doc = Document::default();
        assert!(doc.add_sub_category(999, 10, "orphan".to_string()).is_none());
    }

    #[test]
    fn test_delete_root_category_keeps_posts() {
        let mut doc = doc_with_children(&[10]);
        doc.prepend_post(post(100, 10));

        assert!(doc.delete_root_category(1));
        assert!(doc.categories.is_empty());
        // The post survives with a dangling reference.
        assert_eq!(doc.posts.len(), 1);
        assert!(doc.posts_in_category(10).len() == 1);
    }

    #[test]
    fn test_delete_sub_category_from_every_parent() {
        let mut doc = doc_with_children(&[10, 11]);
        doc.add_root_category(2, "work".to_string());
        doc.add_sub_category(2, 10, "dup".to_string()).unwrap();

        assert!(doc.delete_sub_category(10));
        assert_eq!(doc.categories[0].children.len(), 1);
        assert!(doc.categories[1].children.is_empty());
        assert!(!doc.delete_sub_category(10));
    }

    #[test]
    fn test_reorder_swaps_adjacent_siblings() {
        let mut doc = doc_with_children(&[10, 11, 12]);

        assert_eq!(doc.reorder_child(1, 1, 1), Some(true));
        let ids: Vec<i64> = doc.categories[0].children.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 12, 11]);

        assert_eq!(doc.reorder_child(1, 0, -1), Some(false));
        assert_eq!(doc.reorder_child(1, 2, 1), Some(false));
        let ids: Vec<i64> = doc.categories[0].children.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 12, 11]);

        assert_eq!(doc.reorder_child(999, 0, 1), None);
    }

    #[test]
    fn test_reorder_out_of_range_index_is_noop() {
        let mut doc = doc_with_children(&[10]);
        assert_eq!(doc.reorder_child(1, 5, 1), Some(false));
        assert_eq!(doc.reorder_child(1, usize::MAX, 1), Some(false));
    }

    #[test]
    fn test_prepend_and_replace_post() {
        let mut doc = doc_with_children(&[10]);
        doc.prepend_post(post(100, 10));
        doc.prepend_post(post(101, 10));
        assert_eq!(doc.posts[0].id, 101);

        let mut updated = post(100, 10);
        updated.title = "edited".to_string();
        assert!(doc.replace_post(updated));
        // Replacement is in place: order unchanged, id preserved.
        assert_eq!(doc.posts[1].id, 100);
        assert_eq!(doc.posts[1].title, "edited");

        assert!(!doc.replace_post(post(999, 10)));
    }

    #[test]
    fn test_posts_in_category_preserves_order() {
        let mut doc = doc_with_children(&[10, 11]);
        for id in [100, 101, 102, 103] {
            doc.prepend_post(post(id, if id % 2 == 0 { 10 } else { 11 }));
        }

        let ids: Vec<i64> = doc.posts_in_category(10).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![102, 100]);
        assert!(doc.posts_in_category(999).is_empty());
    }

    #[test]
    fn test_payload_round_trip() {
        let mut doc = doc_with_children(&[10]);
        doc.prepend_post(post(100, 10));

        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);

        // The wire format uses camelCase for post fields.
        assert!(json.contains("\"categoryId\""));
    }
}
