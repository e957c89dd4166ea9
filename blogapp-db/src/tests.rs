use crate::client::PostStore;
use blogapp_common::model::post::{Author, Comment, NewBlogPost, PostContent};

pub(crate) fn sample_post(n: usize) -> NewBlogPost {
    NewBlogPost {
        content: PostContent {
            title: format!("Post number {n}"),
            author: Author {
                first_name: format!("First{n}"),
                last_name: format!("Last{n}"),
            },
            content: format!("Content of post {n}"),
        },
        comments: vec![Comment {
            content: format!("Comment on post {n}"),
        }],
    }
}

/// Runs the same lifecycle against any store implementation.
pub(crate) async fn exercise_store(store: &dyn PostStore) {
    store.clear().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.find_all().await.unwrap().is_empty());

    let seeded = store
        .insert_many(&(0..5).map(sample_post).collect::<Vec<_>>())
        .await
        .unwrap();
    assert_eq!(seeded.len(), 5);
    assert_eq!(store.count().await.unwrap(), 5);
    assert_eq!(store.find_all().await.unwrap().len(), 5);

    let found = store.find_by_id(seeded[0].id).await.unwrap().unwrap();
    assert_eq!(found, seeded[0]);

    let created = store.insert(&sample_post(5)).await.unwrap();
    assert_eq!(created.title, "Post number 5");
    assert_eq!(created.author.first_name, "First5");
    assert_eq!(store.count().await.unwrap(), 6);

    let replacement = PostContent {
        title: "Updated title".to_owned(),
        author: Author {
            first_name: "Updated".to_owned(),
            last_name: "Author".to_owned(),
        },
        content: "Updated content".to_owned(),
    };
    let updated = store
        .update_by_id(created.id, &replacement)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created, created.created);
    assert_eq!(updated.comments, created.comments);
    assert_eq!(updated.title, replacement.title);
    assert_eq!(updated.author, replacement.author);
    assert_eq!(updated.content, replacement.content);
    assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(updated));

    assert!(store.delete_by_id(created.id).await.unwrap());
    assert_eq!(store.find_by_id(created.id).await.unwrap(), None);
    assert!(!store.delete_by_id(created.id).await.unwrap());
    assert_eq!(
        store.update_by_id(created.id, &replacement).await.unwrap(),
        None
    );
    assert_eq!(store.count().await.unwrap(), 5);

    store.clear().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);
}
