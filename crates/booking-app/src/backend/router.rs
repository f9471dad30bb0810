//! HTTP surface of the development backend, shaped like json-server:
//!
//! - `GET /{collection}` with optional filters
//! - `POST /{collection}` creates and answers `201` with the new record
//! - `GET | PUT | PATCH | DELETE /{collection}/{id}`

use super::error::{BackendError, BackendResult};
use super::record::Record;
use super::store::StoreClient;
use crate::model::{Bookable, Booking};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Routes for both collections.
pub fn build_router(bookables: StoreClient<Bookable>, bookings: StoreClient<Booking>) -> Router {
    Router::new()
        .merge(collection_router(bookables))
        .merge(collection_router(bookings))
}

/// Routes for one collection, backed by its store.
pub fn collection_router<T: Record>(store: StoreClient<T>) -> Router {
    Router::new()
        .route(
            &format!("/{}", T::COLLECTION),
            get(list::<T>).post(create::<T>),
        )
        .route(
            &format!("/{}/{{id}}", T::COLLECTION),
            get(get_one::<T>)
                .put(replace::<T>)
                .patch(update::<T>)
                .delete(remove::<T>),
        )
        .with_state(store)
}

fn body<B>(payload: Result<Json<B>, JsonRejection>) -> BackendResult<B> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| BackendError::BadRequest(rejection.body_text()))
}

fn record_id(path: Result<Path<u32>, PathRejection>) -> BackendResult<u32> {
    path
        .map(|Path(id)| id)
        .map_err(|rejection| BackendError::BadRequest(rejection.body_text()))
}

fn filter<F>(query: Result<Query<F>, QueryRejection>) -> BackendResult<F> {
    query
        .map(|Query(filter)| filter)
        .map_err(|rejection| BackendError::BadRequest(rejection.body_text()))
}

async fn list<T: Record>(
    State(store): State<StoreClient<T>>,
    query: Result<Query<T::Filter>, QueryRejection>,
) -> BackendResult<Json<Vec<T>>> {
    Ok(Json(store.list(filter(query)?).await?))
}

async fn get_one<T: Record>(
    State(store): State<StoreClient<T>>,
    path: Result<Path<u32>, PathRejection>,
) -> BackendResult<Json<T>> {
    let id = record_id(path)?;
    store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::NotFound(format!("{} {} not found", T::COLLECTION, id)))
}

async fn create<T: Record>(
    State(store): State<StoreClient<T>>,
    payload: Result<Json<T::Create>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<T>)> {
    let created = store.create(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update<T: Record>(
    State(store): State<StoreClient<T>>,
    path: Result<Path<u32>, PathRejection>,
    payload: Result<Json<T::Update>, JsonRejection>,
) -> BackendResult<Json<T>> {
    let id = record_id(path)?;
    Ok(Json(store.update(id, body(payload)?).await?))
}

async fn replace<T: Record>(
    State(store): State<StoreClient<T>>,
    path: Result<Path<u32>, PathRejection>,
    payload: Result<Json<T::Create>, JsonRejection>,
) -> BackendResult<Json<T>> {
    let id = record_id(path)?;
    Ok(Json(store.replace(id, body(payload)?).await?))
}

async fn remove<T: Record>(
    State(store): State<StoreClient<T>>,
    path: Result<Path<u32>, PathRejection>,
) -> BackendResult<Json<Value>> {
    store.delete(record_id(path)?).await?;
    Ok(Json(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StoreActor;
    use crate::model::BookableId;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        let (actor, client) = StoreActor::new(8, vec![Bookable::new(BookableId(1), "Rooms", "Lounge")]);
        tokio::spawn(actor.run());
        collection_router(client)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_get_and_missing() {
        let app = app();
        let (status, body) = send(app.clone(), "GET", "/bookables/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Lounge");

        let (status, body) = send(app, "GET", "/bookables/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let (status, body) = send(
            app(),
            "POST",
            "/bookables",
            Some(r#"{"group":"Kit","title":"Projector","days":[1],"sessions":[0]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, body) = send(app(), "POST", "/bookables", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, _) = send(app(), "PATCH", "/bookables/1", Some(r#"{"days":[8]}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unparseable_id_and_filter_are_json_400() {
        let (status, body) = send(app(), "GET", "/bookables/lamp", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, body) = send(app(), "DELETE", "/bookables/lamp", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (actor, bookings) = StoreActor::<Booking>::new(8, Vec::new());
        tokio::spawn(actor.run());
        let (status, body) = send(
            collection_router(bookings),
            "GET",
            "/bookings?bookableId=abc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
    }
}
