use blogapp_common::model::post::{BlogPost, PostId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A post as the API hands it out. The author is flattened into a display name here
/// and nowhere else.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct PostView {
    pub id: PostId,
    pub author: String,
    pub content: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

impl From<BlogPost> for PostView {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            author: post.author.to_string(),
            content: post.content,
            title: post.title,
            created: post.created,
        }
    }
}
