//! HTML CRUD handlers shared by both record kinds.
//!
//! Every route is mounted under `/{kind}` by [`routes`]: list, view,
//! add, edit, delete. POST handlers answer with a 303 redirect to the
//! record's view page; delete redirects to the list.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::IntoParams;

use crate::api::form::SubmittedForm;
use crate::app_state::AppState;
use crate::domain::{Customer, Hotel, Record, RecordId};
use crate::error::AppError;
use crate::service::RecordService;

/// A record kind with HTML routes.
pub trait Served: Record {
    /// Columns shown on the list page; the first links to the record.
    const LIST_COLUMNS: &'static [&'static str];

    /// Picks this kind's service out of the shared state.
    fn service(state: &AppState) -> &Arc<RecordService<Self>>;
}

impl Served for Hotel {
    const LIST_COLUMNS: &'static [&'static str] = &["name", "city", "state"];

    fn service(state: &AppState) -> &Arc<RecordService<Self>> {
        &state.hotels
    }
}

impl Served for Customer {
    const LIST_COLUMNS: &'static [&'static str] = &["lname", "fname", "email"];

    fn service(state: &AppState) -> &Arc<RecordService<Self>> {
        &state.customers
    }
}

/// Query parameters of list pages.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Opaque cursor from the previous page's "More" link.
    pub page_token: Option<String>,
}

fn render(state: &AppState, template: &str, context: &Value) -> Result<Html<String>, AppError> {
    state.renderer.render(template, context).map(Html)
}

fn view_path<R: Record>(id: RecordId) -> String {
    format!("/{}/{id}", R::KIND)
}

/// `GET /{kind}` — one page of records.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] for a malformed `page_token`.
pub async fn list<R: Served>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let page = R::service(&state)
        .list(params.page_token.as_deref())
        .await?;
    let context = json!({
        "kind": R::KIND,
        "columns": R::LIST_COLUMNS,
        "records": page.items,
        "next_page_token": page.next_cursor.map(|c| c.to_string()),
    });
    render(&state, "list.html", &context)
}

/// `GET /{kind}/{id}` — one record.
///
/// # Errors
///
/// Returns [`AppError::RecordNotFound`] if the record does not exist.
pub async fn view<R: Served>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, AppError> {
    let record = R::service(&state).get(id).await?;
    render(&state, "view.html", &json!({ "kind": R::KIND, "record": record }))
}

fn form_context<R: Served>(action: &str, record: Value) -> Value {
    json!({
        "kind": R::KIND,
        "action": action,
        "fields": R::FORM_FIELDS,
        "record": record,
        "accepts_image": R::ACCEPTS_IMAGE,
    })
}

/// `GET /{kind}/add` — empty form.
///
/// # Errors
///
/// Returns [`AppError::Render`] on template failure.
pub async fn add_form<R: Served>(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "form.html", &form_context::<R>("Add", json!({})))
}

/// `POST /{kind}/add` — create from the submitted form.
///
/// # Errors
///
/// Returns [`AppError`] on invalid input or upload/store failure.
pub async fn add<R: Served>(
    State(state): State<AppState>,
    form: SubmittedForm,
) -> Result<Redirect, AppError> {
    let record = R::service(&state).create(form.fields, form.image).await?;
    Ok(Redirect::to(&view_path::<R>(record.id())))
}

/// `GET /{kind}/{id}/edit` — form pre-filled from the stored record.
///
/// # Errors
///
/// Returns [`AppError::RecordNotFound`] if the record does not exist.
pub async fn edit_form<R: Served>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, AppError> {
    let record = R::service(&state).get(id).await?;
    let record = serde_json::to_value(&record).map_err(|e| AppError::Render(e.to_string()))?;
    render(&state, "form.html", &form_context::<R>("Edit", record))
}

/// `POST /{kind}/{id}/edit` — overwrite the submitted fields.
///
/// # Errors
///
/// Returns [`AppError::RecordNotFound`] if the record does not exist, or
/// [`AppError`] on invalid input or upload/store failure.
pub async fn edit<R: Served>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    form: SubmittedForm,
) -> Result<Redirect, AppError> {
    let record = R::service(&state)
        .update(id, form.fields, form.image)
        .await?;
    Ok(Redirect::to(&view_path::<R>(record.id())))
}

/// `GET /{kind}/{id}/delete` — delete, then back to the list.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] on database failure.
pub async fn delete<R: Served>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Redirect, AppError> {
    R::service(&state).delete(id).await?;
    Ok(Redirect::to(&format!("/{}", R::KIND)))
}

/// CRUD routes for one record kind.
pub fn routes<R: Served>() -> Router<AppState> {
    let base = format!("/{}", R::KIND);
    Router::new()
        .route(&base, get(list::<R>))
        .route(&format!("{base}/add"), get(add_form::<R>).post(add::<R>))
        .route(&format!("{base}/{{id}}"), get(view::<R>))
        .route(
            &format!("{base}/{{id}}/edit"),
            get(edit_form::<R>).post(edit::<R>),
        )
        .route(&format!("{base}/{{id}}/delete"), get(delete::<R>))
}
