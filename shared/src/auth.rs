use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use lambda_http::http::header::{HeaderValue, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};

pub const MISSING_TOKEN: &str = "Missing token";
pub const INVALID_TOKEN_FORMAT: &str = "Invalid token format";

/// Caller identity resolved from the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
}

/// Extracts `<token>` from `Bearer <token>`
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, &'static str> {
    let header = authorization.map(str::trim).filter(|h| !h.is_empty()).ok_or(MISSING_TOKEN)?;
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(INVALID_TOKEN_FORMAT),
    }
}

pub fn unauthorized(message: &str) -> Response<Body> {
    let mut resp = Response::new(Body::from(serde_json::json!({ "error": message }).to_string()));
    *resp.status_mut() = StatusCode::UNAUTHORIZED;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

/// Resolve the caller through Cognito `GetUser`. The error side is a ready 401 response.
pub async fn authenticate_bearer_request(
    cognito_client: &CognitoClient,
    authorization: Option<&str>,
) -> Result<AuthContext, Response<Body>> {
    let token = bearer_token(authorization).map_err(|message| {
        tracing::warn!("🔒 Auth rejected: {}", message);
        unauthorized(message)
    })?;

    let user = cognito_client
        .get_user()
        .access_token(token)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("🔒 Cognito GetUser failed: {}", e);
            unauthorized("Invalid or expired token")
        })?;

    let user_id = user
        .user_attributes()
        .iter()
        .find(|attr| attr.name() == "sub")
        .and_then(|attr| attr.value())
        .unwrap_or_else(|| user.username())
        .to_string();

    tracing::info!("🔓 Authenticated user_id={}", user_id);
    Ok(AuthContext { user_id })
}
