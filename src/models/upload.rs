use serde::{Deserialize, Serialize};

/// Response of `POST /uploads`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresignedUpload {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTargetRequest {
    pub content_type: String,
}

/// Response of `GET /display-url`.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayUrl {
    pub url: String,
}
