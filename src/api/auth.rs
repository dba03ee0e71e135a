/// 認証マネージャー
///
/// クライアントID/シークレットとユーザーのパスワードを使い、
/// パスワードグラントで Bearer トークンを取得します。
/// トークンはキャッシュせず、操作ごとに取り直します。
use crate::api::client::{ApiClient, ApiResult};
use crate::api::endpoints;
use crate::api::error::InfraError;
use crate::api::types::{PasswordGrantRequest, TokenResponse, describe_error};
use reqwest::StatusCode;
use std::fmt;
use tracing::{debug, warn};

/// パスワードグラントに必要な認証情報
///
/// 構築後は変更されない。`Debug` ではシークレットとパスワードを伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn grant_request(&self) -> PasswordGrantRequest<'_> {
        PasswordGrantRequest {
            grant_type: "password",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            username: &self.username,
            password: &self.password,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &mask_secret(&self.client_id))
            .field("client_secret", &"***")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// `Authorization: Bearer {token}` ヘッダー
///
/// `Debug` / `Display` ではトークンを出さない。
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    token: String,
}

impl AuthHeader {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// ヘッダーの値（"Bearer <token>"）
    pub fn value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthHeader(Bearer ***)")
    }
}

impl fmt::Display for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer ***")
    }
}

/// 認証マネージャー
#[derive(Debug, Clone)]
pub struct AuthManager {
    credentials: Credentials,
}

impl AuthManager {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// トークンエンドポイントから Bearer ヘッダーを取得
    ///
    /// # Errors
    /// - HTTP 401: `Authentication`
    /// - その他の非200: `Client{status_code}`
    /// - 200 だが `error` を含む / `access_token` が無い: `MalformedResponse`
    pub async fn get_auth_header(&self, client: &ApiClient) -> ApiResult<AuthHeader> {
        debug!(
            client_id = %mask_secret(&self.credentials.client_id),
            username = %mask_secret(&self.credentials.username),
            "requesting access token"
        );

        let response = client
            .post(endpoints::TOKEN, &self.credentials.grant_request(), None)
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                warn!(
                    username = %mask_secret(&self.credentials.username),
                    "token endpoint rejected credentials"
                );
                return Err(InfraError::authentication("Incorrect credentials"));
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(InfraError::client(endpoints::TOKEN, status.as_u16(), body));
            }
        }

        let token: TokenResponse = ApiClient::parse_json(response, endpoints::TOKEN).await?;

        if let Some(error) = &token.error {
            return Err(InfraError::malformed(endpoints::TOKEN, describe_error(error)));
        }

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| InfraError::malformed(endpoints::TOKEN, "access_token is missing"))?;

        debug!(expires_in = ?token.expires_in, access_token = "***", "access token issued");
        Ok(AuthHeader::bearer(access_token))
    }

    /// 認証情報をテスト（トークンを1回取得できるか）
    pub async fn test_credentials(&self, client: &ApiClient) -> ApiResult<()> {
        self.get_auth_header(client).await.map(|_| ())
    }
}

/// 識別子をログ・表示用にマスキング
///
/// 8文字以下は全て伏せ、それより長い場合は先頭4文字と末尾4文字だけ残す。
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}
