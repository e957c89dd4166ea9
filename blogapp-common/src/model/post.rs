use crate::model::Id;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

pub type PostId = Id<PostMarker>;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

/// Formats as `"First Last"`, the form the API hands out.
impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Comment {
    pub content: String,
}

/// The fields of a post that can be replaced after creation.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostContent {
    pub title: String,
    pub author: Author,
    pub content: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct NewBlogPost {
    #[serde(flatten)]
    pub content: PostContent,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub author: Author,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub comments: Vec<Comment>,
}

impl From<PostContent> for NewBlogPost {
    fn from(content: PostContent) -> Self {
        Self {
            content,
            comments: Vec::new(),
        }
    }
}

impl BlogPost {
    #[must_use]
    pub fn new(id: PostId, created: OffsetDateTime, post: NewBlogPost) -> Self {
        let NewBlogPost { content, comments } = post;

        Self {
            id,
            title: content.title,
            author: content.author,
            content: content.content,
            created,
            comments,
        }
    }

    /// Replaces the mutable fields. `id`, `created` and `comments` are kept.
    pub fn replace_content(&mut self, content: PostContent) {
        self.title = content.title;
        self.author = content.author;
        self.content = content.content;
    }
}

#[cfg(test)]
mod tests {
    use crate::model::post::{Author, BlogPost, Comment, NewBlogPost, PostContent, PostId};
    use time::macros::datetime;

    fn author(first_name: &str, last_name: &str) -> Author {
        Author {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        }
    }

    #[test]
    fn author_display() {
        assert_eq!(author("Ada", "Lovelace").to_string(), "Ada Lovelace");
    }

    #[test]
    fn post_content_from_json() {
        let content: PostContent = serde_json::from_str(
            r#"{"title": "On engines", "author": {"firstName": "Ada", "lastName": "Lovelace"}, "content": "Notes."}"#,
        )
        .unwrap();

        assert_eq!(content.title, "On engines");
        assert_eq!(content.author, author("Ada", "Lovelace"));
        assert_eq!(content.content, "Notes.");

        let missing_author =
            serde_json::from_str::<PostContent>(r#"{"title": "t", "content": "c"}"#);
        assert!(missing_author.is_err());

        let null_title = serde_json::from_str::<PostContent>(
            r#"{"title": null, "author": {"firstName": "a", "lastName": "b"}, "content": "c"}"#,
        );
        assert!(null_title.is_err());
    }

    #[test]
    fn new_blog_post_comments_default_to_empty() {
        let post: NewBlogPost = serde_json::from_str(
            r#"{"title": "t", "author": {"firstName": "a", "lastName": "b"}, "content": "c"}"#,
        )
        .unwrap();
        assert!(post.comments.is_empty());

        let post: NewBlogPost = serde_json::from_str(
            r#"{"title": "t", "author": {"firstName": "a", "lastName": "b"}, "content": "c", "comments": [{"content": "first"}]}"#,
        )
        .unwrap();
        assert_eq!(
            post.comments,
            vec![Comment {
                content: "first".to_owned()
            }]
        );
    }

    #[test]
    fn replace_content_keeps_identity() {
        let id: PostId = "6592008001020304050a0b0c".parse().unwrap();
        let created = datetime!(2024-01-01 00:00 UTC);
        let mut post = BlogPost::new(
            id,
            created,
            NewBlogPost {
                content: PostContent {
                    title: "old".to_owned(),
                    author: author("Old", "Author"),
                    content: "old content".to_owned(),
                },
                comments: vec![Comment {
                    content: "kept".to_owned(),
                }],
            },
        );

        post.replace_content(PostContent {
            title: "new".to_owned(),
            author: author("New", "Author"),
            content: "new content".to_owned(),
        });

        assert_eq!(post.id, id);
        assert_eq!(post.created, created);
        assert_eq!(post.title, "new");
        assert_eq!(post.author, author("New", "Author"));
        assert_eq!(post.content, "new content");
        assert_eq!(post.comments.len(), 1);
    }
}
