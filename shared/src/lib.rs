//! Infrastructure shared by the lambdas and by clients of the listing image API.

use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

pub mod api_client;
pub mod auth;
pub mod compression;
pub mod config;
pub mod s3_presign;

pub use config::{AppConfig, ClientConfig};

/// AWS clients and settings built once per lambda cold start
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    pub cognito_client: CognitoClient,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: AppConfig) -> Self {
        AppState {
            dynamo_client: DynamoClient::new(sdk_config),
            s3_client: S3Client::new(sdk_config),
            cognito_client: CognitoClient::new(sdk_config),
            config,
        }
    }
}
