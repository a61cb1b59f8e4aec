use super::*;

#[test]
fn accepted_types_map_to_extensions() {
    assert_eq!(extension_for("image/png"), Ok("png"));
    assert_eq!(extension_for("image/jpeg"), Ok("jpg"));
    assert_eq!(extension_for("image/jpg"), Ok("jpg"));
}

#[test]
fn content_type_case_is_ignored() {
    assert_eq!(extension_for("IMAGE/JPEG"), Ok("jpg"));
    assert_eq!(extension_for("Image/Png"), Ok("png"));
}

#[test]
fn other_types_are_rejected() {
    assert!(extension_for("image/gif").is_err());
    assert!(extension_for("application/pdf").unwrap_err().contains("image/png"));
    assert_eq!(extension_for(""), Err("Content-Type is required".to_string()));
}

#[test]
fn keys_live_under_prefix_with_fresh_uuid() {
    let first = object_key("png");
    let second = object_key("png");
    assert_ne!(first, second);

    let name = first.strip_prefix("listing-images/").unwrap();
    let (id, ext) = name.rsplit_once('.').unwrap();
    assert_eq!(ext, "png");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[test]
fn public_url_points_at_bucket() {
    assert_eq!(
        public_url("sanca-listing-images", "listing-images/x.jpg"),
        "https://sanca-listing-images.s3.amazonaws.com/listing-images/x.jpg"
    );
}

#[test]
fn wire_names_match_the_api() {
    let request: PresignRequest =
        serde_json::from_str(r#"{"filename":"a.png","contentType":"image/png"}"#).unwrap();
    assert_eq!(request.content_type, "image/png");

    let response = PresignResponse {
        url: "https://s3/put".to_string(),
        public_url: "https://bucket.s3.amazonaws.com/k".to_string(),
        key: "k".to_string(),
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["publicURL"], "https://bucket.s3.amazonaws.com/k");
    assert_eq!(json["url"], "https://s3/put");
}
