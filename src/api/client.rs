/// HTTPクライアント
///
/// Gfycat APIとの通信を担当するHTTPクライアント。
/// タイムアウト、通信エラーの分類、Bearer認証ヘッダーの付与を含みます。
/// ステータスコードの解釈は各操作側で行い、共通の分類だけをここに置きます。
use crate::api::auth::AuthHeader;
use crate::api::endpoints::Endpoints;
use crate::api::error::InfraError;
use crate::config::APP_CONFIG;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// APIクライアントの結果型
pub type ApiResult<T> = Result<T, InfraError>;

/// APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Endpoints,
}

impl ApiClient {
    /// 新しいAPIクライアントを作成
    ///
    /// # Arguments
    /// * `endpoints` - 接続先ホストの組（テストではモックサーバー）
    pub fn new(endpoints: Endpoints) -> ApiResult<Self> {
        let timeout = Duration::from_secs(APP_CONFIG.api.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gfyeet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InfraError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoints })
    }

    /// デフォルトのプロダクション環境クライアントを作成
    pub fn production() -> ApiResult<Self> {
        Self::new(Endpoints::production())
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GETリクエストを送信
    pub async fn get(&self, endpoint: &str, auth: Option<&AuthHeader>) -> ApiResult<Response> {
        let url = self.endpoints.api_url(endpoint);
        let request = Self::build_request(self.client.get(&url), auth);

        Self::send_with_error_handling(request, endpoint, "GET").await
    }

    /// HEADリクエストを送信
    pub async fn head(&self, endpoint: &str, auth: Option<&AuthHeader>) -> ApiResult<Response> {
        let url = self.endpoints.api_url(endpoint);
        let request = Self::build_request(self.client.head(&url), auth);

        Self::send_with_error_handling(request, endpoint, "HEAD").await
    }

    /// JSONボディ付きPOSTリクエストを送信
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
        auth: Option<&AuthHeader>,
    ) -> ApiResult<Response> {
        let url = self.endpoints.api_url(endpoint);
        let request = Self::build_request(self.client.post(&url).json(body), auth);

        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// ボディ無しPOSTリクエストを送信
    pub async fn post_empty(&self, endpoint: &str, auth: Option<&AuthHeader>) -> ApiResult<Response> {
        let url = self.endpoints.api_url(endpoint);
        let request = Self::build_request(self.client.post(&url), auth);

        Self::send_with_error_handling(request, endpoint, "POST").await
    }

    /// multipart/form-data でファイルを file drop ホストへ送信
    ///
    /// 送信先はAPIホストではないため、認証ヘッダーは付けない。
    pub async fn post_multipart(&self, form: Form) -> ApiResult<Response> {
        let url = self.endpoints.filedrop_url().to_string();
        let request = self.client.post(&url).multipart(form);

        Self::send_with_error_handling(request, &url, "POST").await
    }

    /// 認証ヘッダーを付与したリクエストを構築
    fn build_request(
        mut request: reqwest::RequestBuilder,
        auth: Option<&AuthHeader>,
    ) -> reqwest::RequestBuilder {
        if let Some(auth) = auth {
            request = request.header(AUTHORIZATION, auth.value());
        }
        request
    }

    /// リクエストを送信し、通信エラーを分類する
    async fn send_with_error_handling(
        request: reqwest::RequestBuilder,
        endpoint: &str,
        method: &str,
    ) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InfraError::timeout(format!("{} {}", method, endpoint))
            } else if e.is_connect() {
                InfraError::network(format!("Connection failed for {} {}: {}", method, endpoint, e))
            } else {
                InfraError::network(format!("Request failed for {} {}: {}", method, endpoint, e))
            }
        })?;

        debug!(method, endpoint, status = response.status().as_u16(), "gfycat response");
        Ok(response)
    }

    /// 想定外のステータスコードをエラーに変換
    ///
    /// 401 は認証エラー、それ以外は `Client{status_code}` とする。
    /// ボディは診断用にメッセージへ残す。
    pub async fn unexpected_status(response: Response, endpoint: &str) -> InfraError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if status == StatusCode::UNAUTHORIZED {
            InfraError::authentication(format!("{} rejected the bearer token", endpoint))
        } else {
            InfraError::client(endpoint, status.as_u16(), body)
        }
    }

    /// JSONレスポンスをデシリアライズ
    ///
    /// 2xx でもボディが壊れている場合は `MalformedResponse` とする。
    pub async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> ApiResult<T> {
        let body = response
            .text()
            .await
            .map_err(|e| InfraError::network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            InfraError::malformed(endpoint, format!("Failed to parse JSON response: {}", e))
        })
    }
}
