use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const AUTH_USERNAME: &str = "John";
pub const AUTH_PASSWORD: &str = "12345";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
}

impl User {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub name: Option<String>,
}

impl UserQuery {
    fn matches(&self, user: &User) -> bool {
        self.name.as_deref().map_or(true, |name| user.name == name)
    }
}

#[derive(Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
}

pub type Db = Arc<RwLock<BTreeMap<u32, User>>>;

pub fn seed_users() -> Vec<User> {
    vec![
        User::new(1, "Mike"),
        User::new(2, "Chris"),
        User::new(3, "Ricardo"),
        User::new(4, "Aaron"),
    ]
}

pub fn seed_auth_users() -> Vec<User> {
    vec![
        User::new(1, "Mike"),
        User::new(2, "Chris"),
        User::new(3, "Ricardo"),
        User::new(4, "Aaron"),
        User::new(5, "Mike"),
    ]
}

/// Router with `/users` open and `/authusers` behind Basic auth, both seeded.
pub fn app() -> Router {
    app_with(seed_users(), seed_auth_users())
}

pub fn app_with(users: Vec<User>, auth_users: Vec<User>) -> Router {
    resource("/users", db(users)).merge(
        resource("/authusers", db(auth_users)).route_layer(middleware::from_fn(require_basic_auth)),
    )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn db(users: Vec<User>) -> Db {
    Arc::new(RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()))
}

fn resource(path: &str, db: Db) -> Router {
    Router::new()
        .route(path, get(list_users).post(create_user).delete(delete_users))
        .route(
            &format!("{path}/{{id}}"),
            get(get_user).put(replace_user).patch(patch_user).delete(delete_user),
        )
        .with_state(db)
}

async fn require_basic_auth(request: Request, next: Next) -> Response {
    let expected = format!("{AUTH_USERNAME}:{AUTH_PASSWORD}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .is_some_and(|decoded| decoded == expected.as_bytes());

    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"users\"")],
        )
            .into_response();
    }
    next.run(request).await
}

async fn list_users(State(db): State<Db>, Query(filter): Query<UserQuery>) -> Json<Vec<User>> {
    let users = db.read().await;
    Json(users.values().filter(|u| filter.matches(u)).cloned().collect())
}

async fn create_user(
    State(db): State<Db>,
    uri: Uri,
    Json(user): Json<User>,
) -> Result<impl IntoResponse, StatusCode> {
    let mut users = db.write().await;
    if users.contains_key(&user.id) {
        return Err(StatusCode::CONFLICT);
    }
    users.insert(user.id, user.clone());
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

async fn delete_users(State(db): State<Db>, Query(filter): Query<UserQuery>) -> StatusCode {
    db.write().await.retain(|_, u| !filter.matches(u));
    StatusCode::NO_CONTENT
}

async fn get_user(State(db): State<Db>, Path(id): Path<u32>) -> Result<Json<User>, StatusCode> {
    let users = db.read().await;
    users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// PUT replaces or inserts; the id in the path wins over the body.
async fn replace_user(State(db): State<Db>, Path(id): Path<u32>, Json(mut user): Json<User>) -> Json<User> {
    user.id = id;
    db.write().await.insert(id, user.clone());
    Json(user)
}

async fn patch_user(
    State(db): State<Db>,
    Path(id): Path<u32>,
    Json(input): Json<UserPatch>,
) -> Result<Json<User>, StatusCode> {
    let mut users = db.write().await;
    let user = users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u32>) -> Result<StatusCode, StatusCode> {
    let mut users = db.write().await;
    users.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
