use lambda_http::http::header::{HeaderValue, AUTHORIZATION, VARY};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use sanca_atoms as atoms;
use sanca_shared::{auth, s3_presign, AppState};
use std::sync::Arc;

fn with_cors_headers(mut resp: Response<Body>, cors_origin: &str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(cors_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    if cors_origin != "*" {
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }

    resp
}

fn finalize_response(resp: Result<Response<Body>, Error>, cors_origin: &str) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, cors_origin))
}

fn json_error(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({ "error": message }).to_string().into())
        .map_err(Box::new)?)
}

fn not_found() -> Result<Response<Body>, Error> {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

fn listing_id_param(event: &Request) -> Option<String> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first("listing_id"))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Main Lambda handler - routes /listing-images requests
pub(crate) async fn function_handler(event: Request, state: Arc<AppState>) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    let cors_origin = state.config.cors_origin.as_str();
    tracing::info!("🚀 API Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, cors_origin));
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.first() != Some(&"listing-images") {
        return finalize_response(not_found(), cors_origin);
    }

    // Reads are public
    if method == Method::GET {
        return finalize_response(public_routes(&event, &state, &parts).await, cors_origin);
    }

    let authorization = event.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let auth_ctx = match auth::authenticate_bearer_request(&state.cognito_client, authorization).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(with_cors_headers(resp, cors_origin)),
    };

    finalize_response(
        authenticated_routes(&event, &state, &auth_ctx.user_id, &method, &parts).await,
        cors_origin,
    )
}

async fn public_routes(event: &Request, state: &AppState, parts: &[&str]) -> Result<Response<Body>, Error> {
    let table_name = state.config.table_name.as_str();

    match parts {
        // GET /listing-images/listing/{listing_id} - images of a listing, cover first
        ["listing-images", "listing", listing_id] => {
            atoms::media::list_listing_images_handler(&state.dynamo_client, table_name, listing_id).await
        }
        // GET /listing-images/{id}?listing_id= - one image
        ["listing-images", image_id] => match listing_id_param(event) {
            Some(listing_id) => {
                atoms::media::get_listing_image_handler(&state.dynamo_client, table_name, &listing_id, image_id)
                    .await
            }
            None => json_error(StatusCode::BAD_REQUEST, "Missing listing_id query parameter"),
        },
        _ => not_found(),
    }
}

async fn authenticated_routes(
    event: &Request,
    state: &AppState,
    user_id: &str,
    method: &Method,
    parts: &[&str],
) -> Result<Response<Body>, Error> {
    let table_name = state.config.table_name.as_str();
    let body = event.body();

    match (method, parts) {
        // POST /listing-images/s3 - presigned upload URL
        (&Method::POST, ["listing-images", "s3"]) => {
            s3_presign::presign_upload_handler(
                &state.s3_client,
                &state.config.bucket_name,
                state.config.presign_expires,
                body,
            )
            .await
        }
        // POST /listing-images - create image record
        (&Method::POST, ["listing-images"]) => {
            atoms::media::create_listing_image_handler(&state.dynamo_client, table_name, user_id, body).await
        }
        // PUT /listing-images/{id}?listing_id= - update order/src (seller only)
        (&Method::PUT, ["listing-images", image_id]) => match listing_id_param(event) {
            Some(listing_id) => {
                atoms::media::update_listing_image_handler(
                    &state.dynamo_client,
                    table_name,
                    user_id,
                    &listing_id,
                    image_id,
                    body,
                )
                .await
            }
            None => json_error(StatusCode::BAD_REQUEST, "Missing listing_id query parameter"),
        },
        // DELETE /listing-images/{id}?listing_id= - delete image (seller only)
        (&Method::DELETE, ["listing-images", image_id]) => match listing_id_param(event) {
            Some(listing_id) => {
                atoms::media::delete_listing_image_handler(
                    &state.dynamo_client,
                    table_name,
                    user_id,
                    &listing_id,
                    image_id,
                )
                .await
            }
            None => json_error(StatusCode::BAD_REQUEST, "Missing listing_id query parameter"),
        },
        _ => not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanca_shared::AppConfig;

    fn state(cors_origin: &str) -> Arc<AppState> {
        let sdk_config = aws_config::SdkConfig::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new("ap-southeast-2"))
            .build();
        let config = AppConfig {
            cors_origin: cors_origin.to_string(),
            ..AppConfig::from_lookup(|_| None)
        };
        Arc::new(AppState::new(&sdk_config, config))
    }

    fn request(method: &str, uri: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::Empty)
            .unwrap()
    }

    #[tokio::test]
    async fn preflight_gets_cors_headers() {
        let resp = function_handler(request("OPTIONS", "/listing-images"), state("https://sanca.app"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "https://sanca.app");
        assert_eq!(resp.headers()[VARY], "Origin");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let resp = function_handler(request("GET", "/listings"), state("*")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn get_image_requires_listing_id() {
        let resp = function_handler(request("GET", "/listing-images/img-1"), state("*"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mutations_require_bearer_token() {
        let resp = function_handler(request("DELETE", "/listing-images/img-1?listing_id=l-1"), state("*"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }
}
