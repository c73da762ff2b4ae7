//! Read-only admin pages over the mirror, behind HTTP Basic auth.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::header,
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

mod pages;

use pages::{DetailPage, Entity, ListPage};

const TEMPLATES: [(&str, &str); 4] = [
    (
        "admin/base.html",
        include_str!("../../templates/admin/base.html"),
    ),
    (
        "admin/index.html",
        include_str!("../../templates/admin/index.html"),
    ),
    (
        "admin/list.html",
        include_str!("../../templates/admin/list.html"),
    ),
    (
        "admin/detail.html",
        include_str!("../../templates/admin/detail.html"),
    ),
];

/// Compiles the admin templates embedded in the binary.
pub fn templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    tera.autoescape_on(vec![".html"]);
    Ok(tera)
}

/// Parses `Authorization: Basic ...` into a user and password.
fn basic_credentials(req: &Request) -> Option<(String, String)> {
    let encoded = req
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> ApiResult<Response> {
    // No password configured means no admin at all.
    let Some(expected) = state.auth.admin_password.as_deref() else {
        return Err(ApiError::NotFound("admin is disabled".to_string()));
    };

    match basic_credentials(&req) {
        Some((user, password)) if user == state.auth.admin_user && password == expected => {
            Ok(next.run(req).await)
        }
        _ => Err(ApiError::AdminChallenge),
    }
}

fn render<T: Serialize>(state: &AppState, template: &str, page: &T) -> ApiResult<Html<String>> {
    let context = Context::from_serialize(page)?;
    Ok(Html(state.templates.render(template, &context)?))
}

#[derive(Serialize)]
struct IndexEntry {
    slug: &'static str,
    title: &'static str,
}

#[derive(Serialize)]
struct IndexPage {
    entities: Vec<IndexEntry>,
}

async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let page = IndexPage {
        entities: Entity::ALL
            .iter()
            .map(|entity| IndexEntry {
                slug: entity.slug(),
                title: entity.title(),
            })
            .collect(),
    };
    render(&state, "admin/index.html", &page)
}

async fn list(
    State(state): State<Arc<AppState>>,
    Path(entity): Path<String>,
) -> ApiResult<Html<String>> {
    let entity = Entity::from_slug(&entity)?;
    let page: ListPage = pages::list_page(&state, entity)?;
    render(&state, "admin/list.html", &page)
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Path((entity, id)): Path<(String, String)>,
) -> ApiResult<Html<String>> {
    let entity = Entity::from_slug(&entity)?;
    let page: DetailPage = pages::detail_page(&state, entity, &id)?;
    render(&state, "admin/detail.html", &page)
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/:entity", get(list))
        .route("/:entity/:id", get(detail))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
