//! In-process post store, for tests and for running without a database.

use crate::client::{PostStore, Result, stamp_post};
use async_trait::async_trait;
use blogapp_common::model::post::{BlogPost, NewBlogPost, PostContent, PostId};
use blogapp_common::object_id::ObjectIdGenerator;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Keeps posts in a map behind an async `RwLock`. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<BTreeMap<PostId, BlogPost>>,
    id_generator: ObjectIdGenerator,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_many(&self, posts: &[NewBlogPost]) -> Result<Vec<BlogPost>> {
        let posts = posts
            .iter()
            .map(|post| stamp_post(&self.id_generator, post))
            .collect::<Result<Vec<_>>>()?;

        let mut store = self.posts.write().await;
        store.extend(posts.iter().map(|post| (post.id, post.clone())));

        debug!(count = posts.len(), "Inserted posts");
        Ok(posts)
    }

    async fn insert(&self, post: &NewBlogPost) -> Result<BlogPost> {
        let post = stamp_post(&self.id_generator, post)?;

        self.posts.write().await.insert(post.id, post.clone());

        debug!(id = %post.id, "Inserted post");
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<BlogPost>> {
        let mut posts: Vec<_> = self.posts.read().await.values().cloned().collect();
        posts.sort_by_key(|post| (post.created, post.id));

        Ok(posts)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn update_by_id(&self, id: PostId, content: &PostContent) -> Result<Option<BlogPost>> {
        let mut store = self.posts.write().await;
        let post = store.get_mut(&id).map(|post| {
            post.replace_content(content.clone());
            post.clone()
        });

        debug!(%id, found = post.is_some(), "Updated post");
        Ok(post)
    }

    async fn delete_by_id(&self, id: PostId) -> Result<bool> {
        let deleted = self.posts.write().await.remove(&id).is_some();

        debug!(%id, deleted, "Deleted post");
        Ok(deleted)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn clear(&self) -> Result<()> {
        self.posts.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::PostStore;
    use crate::memory::MemoryStore;
    use crate::tests::{exercise_store, sample_post};

    #[tokio::test]
    async fn memory_store_crud() {
        exercise_store(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn find_all_is_oldest_first() {
        let store = MemoryStore::new();
        let first = store.insert(&sample_post(1)).await.unwrap();
        let second = store.insert(&sample_post(2)).await.unwrap();
        let third = store.insert(&sample_post(3)).await.unwrap();

        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }
}
