//! Account Routes: signup, login and logout

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use forms::{FormError, FormErrors, LoginForm, SignupForm};
use std::collections::HashMap;
use std::sync::Arc;
use storage::StorageError;
use tower_sessions::Session;
use tracing::info;

use crate::auth::{self, CsrfForm, LOGIN_URL};
use crate::error::AppError;
use crate::templates::{self, PageContext};
use crate::AppState;

/// Render the signup form
pub async fn signup_form(session: Session) -> Result<Response, AppError> {
    let token = auth::csrf_token(&session).await?;
    let ctx = PageContext {
        username: None,
        csrf_token: &token,
    };
    Ok(templates::signup_page(&ctx, &SignupForm::default(), &FormErrors::new()).into_response())
}

/// Create an account, then send the user to the login page
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(input): Form<CsrfForm<SignupForm>>,
) -> Result<Response, AppError> {
    auth::verify_csrf(&session, &input.csrf_token).await?;
    let form = input.form;

    let errors = match form.validate() {
        Ok(signup) => {
            if state.repository.username_exists(&signup.username).await? {
                username_taken()
            } else {
                let hash = auth::hash_password_blocking(signup.password).await?;
                match state.repository.create_user(&signup.username, &hash).await {
                    Ok(user) => {
                        info!("New account {} ({})", user.id, user.username);
                        return Ok(Redirect::to(LOGIN_URL).into_response());
                    }
                    Err(StorageError::UsernameTaken(_)) => username_taken(),
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Err(errors) => errors,
    };

    let token = auth::csrf_token(&session).await?;
    let ctx = PageContext {
        username: None,
        csrf_token: &token,
    };
    Ok(templates::signup_page(&ctx, &form, &errors).into_response())
}

fn username_taken() -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add_field("username", FormError::UsernameTaken);
    errors
}

/// Render the login form, keeping `?next=`
pub async fn login_form(
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let token = auth::csrf_token(&session).await?;
    let form = LoginForm {
        next: params.get("next").cloned().unwrap_or_default(),
        ..Default::default()
    };
    let ctx = PageContext {
        username: None,
        csrf_token: &token,
    };
    Ok(templates::login_page(&ctx, &form, &FormErrors::new()).into_response())
}

/// Check credentials and start an authenticated session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(input): Form<CsrfForm<LoginForm>>,
) -> Result<Response, AppError> {
    auth::verify_csrf(&session, &input.csrf_token).await?;
    let form = input.form;

    let errors = match form.validate() {
        Ok(creds) => {
            let user = state.repository.find_user_by_username(&creds.username).await?;
            let verified = match &user {
                Some(user) => {
                    auth::verify_password_blocking(creds.password, user.password_hash.clone())
                        .await?
                }
                None => auth::verify_unknown_user_blocking(creds.password).await?,
            };
            match user {
                Some(user) if verified => {
                    auth::login(&session, &user).await?;
                    info!("User {} logged in", user.id);
                    return Ok(Redirect::to(form.redirect_target()).into_response());
                }
                _ => {
                    info!("Failed login for {:?}", creds.username);
                    FormErrors::from_non_field(FormError::InvalidCredentials)
                }
            }
        }
        Err(errors) => errors,
    };

    let token = auth::csrf_token(&session).await?;
    let ctx = PageContext {
        username: None,
        csrf_token: &token,
    };
    Ok(templates::login_page(&ctx, &form, &errors).into_response())
}

/// End the session
pub async fn logout(
    session: Session,
    Form(input): Form<CsrfForm<HashMap<String, String>>>,
) -> Result<Response, AppError> {
    auth::verify_csrf(&session, &input.csrf_token).await?;
    auth::logout(&session).await?;
    Ok(Redirect::to(LOGIN_URL).into_response())
}
