use driftsign_aws_v4::{Config, Credential};
use std::sync::Arc;

mod multi_region;
mod presigned;
mod standard;

pub fn test_config() -> Arc<Config> {
    Arc::new(Config {
        access_key_id: Some("access_key_id".to_string()),
        secret_access_key: Some("secret_access_key".to_string()),
        region: Some("test".to_string()),
        service: Some("s3".to_string()),
        ..Default::default()
    })
}

pub fn test_credential() -> Credential {
    Credential {
        access_key_id: "access_key_id".to_string(),
        secret_access_key: "secret_access_key".to_string(),
        ..Default::default()
    }
}

pub fn test_request(uri: &str) -> http::request::Parts {
    http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(())
        .expect("request must be valid")
        .into_parts()
        .0
}
