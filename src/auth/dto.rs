use serde::{Deserialize, Serialize};

/// Request body for login. Every field is optional so a missing one yields
/// a 400 instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Accepted for client compatibility; has no effect.
    #[allow(dead_code)]
    #[serde(default)]
    pub remember: Option<serde_json::Value>,
}

/// Request body for forgot-password.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Fields collected from the signup multipart form.
#[derive(Debug, Default)]
pub struct SignupForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture: Option<bytes::Bytes>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub username: String,
}

/// Treats empty strings like absent fields.
pub(crate) fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}
