use blogapp_common::model::{
    ModelValidationError,
    post::{Author, BlogPost, Comment},
};
use sqlx::{FromRow, types::Json};
use time::OffsetDateTime;

#[derive(Clone, Debug, FromRow)]
pub(crate) struct PostRecord {
    pub post_id: String,
    pub title: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub content: String,
    pub created: OffsetDateTime,
    pub comments: Json<Vec<Comment>>,
}

impl TryFrom<PostRecord> for BlogPost {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.trim_end().parse()?,
            title: value.title,
            author: Author {
                first_name: value.author_first_name,
                last_name: value.author_last_name,
            },
            content: value.content,
            created: value.created,
            comments: value.comments.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::record::PostRecord;
    use blogapp_common::model::{
        ModelValidationError,
        post::{BlogPost, Comment},
    };
    use blogapp_common::object_id::ObjectIdParseError;
    use sqlx::types::Json;
    use time::macros::datetime;

    fn record(post_id: &str) -> PostRecord {
        PostRecord {
            post_id: post_id.to_owned(),
            title: "A title".to_owned(),
            author_first_name: "Grace".to_owned(),
            author_last_name: "Hopper".to_owned(),
            content: "Some content".to_owned(),
            created: datetime!(2024-01-01 12:00 UTC),
            comments: Json(vec![Comment {
                content: "Nice".to_owned(),
            }]),
        }
    }

    #[test]
    fn record_into_post() {
        let post = BlogPost::try_from(record("6592008001020304050a0b0c")).unwrap();

        assert_eq!(post.id.to_string(), "6592008001020304050a0b0c");
        assert_eq!(post.author.first_name, "Grace");
        assert_eq!(post.author.last_name, "Hopper");
        assert_eq!(post.created, datetime!(2024-01-01 12:00 UTC));
        assert_eq!(post.comments.len(), 1);
    }

    #[test]
    fn corrupt_id_is_rejected() {
        assert_eq!(
            BlogPost::try_from(record("1234")),
            Err(ModelValidationError::ObjectId(
                ObjectIdParseError::InvalidLength(4)
            ))
        );
    }
}
