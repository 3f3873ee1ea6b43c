use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_endpoint: String,
    pub region: String,
    pub user_pool_id: Option<String>,
    pub user_pool_client_id: Option<String>,
    pub identity_pool_id: Option<String>,
    pub image_bucket: String,
    pub search_index: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            api_endpoint: env::var("FOOD_RESCUE_API_ENDPOINT")?,
            region: env::var("AWS_REGION").unwrap_or_else(|_| "ap-south-1".to_string()),
            user_pool_id: env::var("FOOD_RESCUE_USER_POOL_ID").ok(),
            user_pool_client_id: env::var("FOOD_RESCUE_USER_POOL_CLIENT_ID").ok(),
            identity_pool_id: env::var("FOOD_RESCUE_IDENTITY_POOL_ID").ok(),
            image_bucket: env::var("FOOD_RESCUE_IMAGE_BUCKET")
                .unwrap_or_else(|_| "food-rescue-images".to_string()),
            search_index: env::var("FOOD_RESCUE_SEARCH_INDEX")
                .unwrap_or_else(|_| "food-rescue-index".to_string()),
            request_timeout_secs: env::var("FOOD_RESCUE_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }

    /// Join an API path onto the configured endpoint.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
