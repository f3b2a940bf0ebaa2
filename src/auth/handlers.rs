use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use base64ct::{Base64, Encoding};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{present, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, SignupForm},
        password,
        validation::{is_valid_email, is_valid_password},
    },
    error::ApiError,
    state::AppState,
    users::{NewUser, StoreError},
};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const INVALID_EMAIL: &str = "Invalid email address";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
const USERNAME_TAKEN: &str = "Username already registered";
const EMAIL_TAKEN: &str = "Email already registered";

pub fn auth_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/signup",
            post(signup).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
}

fn server_error(state: &AppState, op: &'static str, err: impl std::fmt::Display) -> ApiError {
    error!(error = %err, op, "request failed");
    state.internal(err)
}

async fn read_signup_form(mut mp: Multipart) -> Result<SignupForm, MultipartError> {
    let mut form = SignupForm::default();
    while let Some(field) = mp.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("name") => form.name = Some(field.text().await?),
            Some("email") => form.email = Some(field.text().await?),
            Some("password") => form.password = Some(field.text().await?),
            // Only an uploaded file counts as the picture; a plain text part is skipped.
            Some("profilePicture") if field.file_name().is_some() => {
                form.profile_picture = Some(field.bytes().await?)
            }
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/signup (multipart: name, email, password, profilePicture)
#[instrument(skip(state, mp))]
pub async fn signup(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let form = match mp {
        Ok(mp) => read_signup_form(mp)
            .await
            .map_err(|e| server_error(&state, "signup", e))?,
        Err(rejection) => {
            warn!(%rejection, "signup body is not multipart");
            SignupForm::default()
        }
    };

    let (Some(name), Some(email), Some(plain), Some(picture)) = (
        present(form.name),
        present(form.email),
        present(form.password),
        form.profile_picture.filter(|b| !b.is_empty()),
    ) else {
        warn!("signup missing fields");
        return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED));
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest(INVALID_EMAIL));
    }

    if !is_valid_password(&plain) {
        warn!("password too short");
        return Err(ApiError::BadRequest(PASSWORD_TOO_SHORT));
    }

    let taken = state
        .users
        .find_by_name(&name)
        .await
        .map_err(|e| server_error(&state, "signup", e))?;
    if taken.is_some() {
        warn!(name = %name, "username already registered");
        return Err(ApiError::BadRequest(USERNAME_TAKEN));
    }

    let taken = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| server_error(&state, "signup", e))?;
    if taken.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::BadRequest(EMAIL_TAKEN));
    }

    let hash = password::hash(plain)
        .await
        .map_err(|e| server_error(&state, "signup", e))?;
    let picture = Base64::encode_string(&picture);

    let user = match state
        .users
        .insert(NewUser {
            name: &name,
            email: &email,
            password_hash: &hash,
            profile_picture: Some(&picture),
        })
        .await
    {
        Ok(u) => u,
        // Lost a race against a concurrent signup after the pre-checks passed.
        Err(StoreError::NameTaken) => {
            warn!(name = %name, "username taken at insert");
            return Err(ApiError::BadRequest(USERNAME_TAKEN));
        }
        Err(StoreError::EmailTaken) => {
            warn!(email = %email, "email taken at insert");
            return Err(ApiError::BadRequest(EMAIL_TAKEN));
        }
        Err(e) => return Err(server_error(&state, "signup", e)),
    };

    info!(user_id = user.id, name = %user.name, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Sign Up successful",
        }),
    ))
}

/// POST /api/login { username, password, remember? }
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload.unwrap_or_default();

    let (Some(username), Some(plain)) = (present(payload.username), present(payload.password))
    else {
        warn!("login missing fields");
        return Err(ApiError::BadRequest("Username and password are required"));
    };

    let user = match state.users.find_by_name(&username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %username, "login unknown username");
            return Err(ApiError::BadRequest("Username not found"));
        }
        Err(e) => return Err(server_error(&state, "login", e)),
    };

    let ok = password::verify(plain, user.password)
        .await
        .map_err(|e| server_error(&state, "login", e))?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::BadRequest("Incorrect password"));
    }

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        username,
    }))
}

/// POST /api/forgot-password { email, newPassword, confirmPassword }
#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload.unwrap_or_default();

    let (Some(email), Some(new_password), Some(confirm)) = (
        present(payload.email),
        present(payload.new_password),
        present(payload.confirm_password),
    ) else {
        warn!("forgot-password missing fields");
        return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED));
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest(INVALID_EMAIL));
    }

    if !is_valid_password(&new_password) {
        warn!("password too short");
        return Err(ApiError::BadRequest(PASSWORD_TOO_SHORT));
    }

    if new_password != confirm {
        warn!("password confirmation mismatch");
        return Err(ApiError::BadRequest("Passwords do not match"));
    }

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| server_error(&state, "forgot-password", e))?;
    if user.is_none() {
        warn!(email = %email, "reset for unregistered email");
        return Err(ApiError::BadRequest("Email not registered"));
    }

    let hash = password::hash(new_password)
        .await
        .map_err(|e| server_error(&state, "forgot-password", e))?;
    let touched = state
        .users
        .update_password(&email, &hash)
        .await
        .map_err(|e| server_error(&state, "forgot-password", e))?;
    if touched == 0 {
        warn!(email = %email, "password update matched no rows");
    }

    info!(email = %email, "password reset");
    Ok(Json(MessageResponse {
        message: "Password reset successful",
    }))
}
