/// gfy メタデータの取得
///
/// `GET /v1/gfycats/{id}` を呼び、`gfyItem` を `GfyMetadata` に写す。
/// 非公開の gfy は所有者のトークンが無いと見えないため、認証ヘッダーを付ける。
use crate::api::auth::{AuthHeader, AuthManager};
use crate::api::client::{ApiClient, ApiResult};
use crate::api::endpoints;
use crate::api::error::InfraError;
use crate::api::types::{GfyItemResponse, describe_error};
use crate::domain::metadata::MetadataLookup;
use reqwest::StatusCode;
use tracing::debug;

/// gfy のメタデータを取得
///
/// # Returns
/// - 200: `MetadataLookup::Valid`
/// - 404: `MetadataLookup::Invalid`（エラーにしない）
/// - 空の id: 通信せずに `MetadataLookup::Invalid`
///
/// # Errors
/// - 401: `Authentication`
/// - その他の非200: `Client{status_code}`
/// - `gfyItem` が無い / `error` を含む: `MalformedResponse`
pub async fn fetch_metadata(
    client: &ApiClient,
    auth: &AuthManager,
    gfy_id: &str,
) -> ApiResult<MetadataLookup> {
    if gfy_id.is_empty() {
        return Ok(MetadataLookup::Invalid);
    }
    let header = auth.get_auth_header(client).await?;
    fetch_metadata_with(client, &header, gfy_id).await
}

pub(crate) async fn fetch_metadata_with(
    client: &ApiClient,
    header: &AuthHeader,
    gfy_id: &str,
) -> ApiResult<MetadataLookup> {
    let endpoint = endpoints::gfycat(gfy_id);
    let response = client.get(&endpoint, Some(header)).await?;

    match response.status() {
        StatusCode::OK => {}
        StatusCode::NOT_FOUND => {
            debug!(gfy_id, "gfy not found");
            return Ok(MetadataLookup::Invalid);
        }
        _ => return Err(ApiClient::unexpected_status(response, &endpoint).await),
    }

    let body: GfyItemResponse = ApiClient::parse_json(response, &endpoint).await?;

    if let Some(error) = &body.error {
        return Err(InfraError::malformed(&endpoint, describe_error(error)));
    }

    body.gfy_item
        .map(MetadataLookup::from)
        .ok_or_else(|| InfraError::malformed(&endpoint, "gfyItem is missing"))
}
