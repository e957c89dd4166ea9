use crate::server::{
    Result, ServerError, ServerRouter,
    json::{Created, Json},
    view::PostView,
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use blogapp_common::model::post::{PostContent, PostId};
use blogapp_db::PostStore;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_put(update_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: PostId,
}

/// Body of `PUT /posts/{id}`. Carries the id again so it can be checked against the path.
#[derive(Deserialize)]
struct UpdatePost {
    id: PostId,
    #[serde(flatten)]
    content: PostContent,
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(store): State<Arc<dyn PostStore>>,
) -> Result<Json<Vec<PostView>>> {
    let posts = store.find_all().await?;

    Ok(Json(posts.into_iter().map(PostView::from).collect()))
}

async fn get_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<dyn PostStore>>,
) -> Result<Json<PostView>> {
    let post = store
        .find_by_id(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post.into()))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(store): State<Arc<dyn PostStore>>,
    Json(content): Json<PostContent>,
) -> Result<Created<PostView>> {
    let post = store.insert(&content.into()).await?;

    info!(id = %post.id, "Created post");
    Ok(Created(post.into()))
}

async fn update_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<dyn PostStore>>,
    Json(update): Json<UpdatePost>,
) -> Result<StatusCode> {
    if update.id != id {
        return Err(ServerError::PostIdMismatch {
            path: id,
            body: update.id,
        });
    }

    store
        .update_by_id(id, &update.content)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    info!(%id, "Updated post");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<dyn PostStore>>,
) -> Result<StatusCode> {
    if !store.delete_by_id(id).await? {
        return Err(ServerError::PostByIdNotFound(id));
    }

    info!(%id, "Deleted post");
    Ok(StatusCode::NO_CONTENT)
}
