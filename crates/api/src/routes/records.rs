//! Sleep Record Routes

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::NaiveDate;
use forms::{FormErrors, SleepRecordForm};
use std::collections::HashMap;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, info};

use crate::auth::{self, CsrfForm, CurrentUser};
use crate::error::AppError;
use crate::templates::{self, PageContext};
use crate::AppState;

/// Layout of the `?date=` filter
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the date filter; anything unparseable means "no filter"
pub fn parse_date_filter(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Ignoring malformed date filter {:?}: {}", raw, e);
            None
        }
    }
}

/// List the current user's records, newest first
pub async fn sleep_list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let raw_date = params.get("date").map(String::as_str);
    let date = parse_date_filter(raw_date);
    let records = state.repository.list_records(user.id, date).await?;

    let token = auth::csrf_token(&session).await?;
    let ctx = PageContext {
        username: Some(&user.username),
        csrf_token: &token,
    };
    Ok(templates::list_page(&ctx, &records, raw_date).into_response())
}

/// Render an empty add-record form
pub async fn add_record_form(user: CurrentUser, session: Session) -> Result<Response, AppError> {
    let token = auth::csrf_token(&session).await?;
    let ctx = PageContext {
        username: Some(&user.username),
        csrf_token: &token,
    };
    Ok(templates::add_page(&ctx, &SleepRecordForm::default(), &FormErrors::new()).into_response())
}

/// Validate and store a record for the current user
pub async fn add_record(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    session: Session,
    Form(input): Form<CsrfForm<SleepRecordForm>>,
) -> Result<Response, AppError> {
    auth::verify_csrf(&session, &input.csrf_token).await?;
    let form = input.form;

    match form.validate_with(&state.limits) {
        Ok(record) => {
            let record = state.repository.insert_record(user.id, &record).await?;
            info!("User {} added sleep record {}", user.id, record.id);
            Ok(Redirect::to("/").into_response())
        }
        Err(errors) => {
            let token = auth::csrf_token(&session).await?;
            let ctx = PageContext {
                username: Some(&user.username),
                csrf_token: &token,
            };
            Ok(templates::add_page(&ctx, &form, &errors).into_response())
        }
    }
}
