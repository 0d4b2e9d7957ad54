use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::api::response::{render, AppQuery, PageError};
use crate::api::templates::{LoginPage, SignupPage, Viewer};
use crate::auth::{self, SESSION_COOKIE};
use crate::storage::DatabaseError;
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NextParams {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl SignupForm {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("Username is required.".to_string());
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ));
        }
        if self.password != self.password_confirm {
            errors.push("Passwords do not match.".to_string());
        }
        errors
    }
}

/// Only follow a `next` target that stays on this site.
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        "/"
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn login_page(
    AppQuery(params): AppQuery<NextParams>,
) -> Result<Response, PageError> {
    let page = LoginPage {
        viewer: Viewer::anonymous(),
        next: params.next.unwrap_or_default(),
        username: String::new(),
        errors: Vec::new(),
    };
    render(&page)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let user = state.db.get_user_by_username(form.username.trim())?;
    let verified = user
        .as_ref()
        .map(|u| auth::verify_password(u, &form.password))
        .unwrap_or(false);

    let user = match (user, verified) {
        (Some(user), true) => user,
        _ => {
            let page = LoginPage {
                viewer: Viewer::anonymous(),
                next: form.next.clone(),
                username: form.username.clone(),
                errors: vec!["Invalid username or password.".to_string()],
            };
            return render(&page);
        }
    };

    let session = auth::start_session(&state, user.id)
        .map_err(|e| PageError::internal(e.to_string()))?;
    tracing::debug!(user_id = user.id, "Logged in");

    let jar = jar.add(session_cookie(session.token));
    Ok((jar, Redirect::to(safe_next(&form.next))).into_response())
}

pub async fn signup_page() -> Result<Response, PageError> {
    let page = SignupPage {
        viewer: Viewer::anonymous(),
        username: String::new(),
        errors: Vec::new(),
    };
    render(&page)
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, PageError> {
    let errors = form.validate();
    if !errors.is_empty() {
        let page = SignupPage {
            viewer: Viewer::anonymous(),
            username: form.username.clone(),
            errors,
        };
        return render(&page);
    }

    let (hash, salt) =
        auth::hash_password(&form.password).map_err(|e| PageError::internal(e.to_string()))?;

    let user = match state.db.create_user(form.username.trim(), &hash, &salt) {
        Ok(user) => user,
        Err(DatabaseError::UsernameTaken(username)) => {
            let page = SignupPage {
                viewer: Viewer::anonymous(),
                username: form.username.clone(),
                errors: vec![format!("Username '{username}' is already taken.")],
            };
            return render(&page);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(user_id = user.id, "Signed up");

    let session = auth::start_session(&state, user.id)
        .map_err(|e| PageError::internal(e.to_string()))?;

    let jar = jar.add(session_cookie(session.token));
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.db.delete_session(cookie.value())?;
    }

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);

    Ok((jar, Redirect::to("/")).into_response())
}
