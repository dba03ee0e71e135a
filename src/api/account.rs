/// アカウント系の操作
///
/// ユーザー名の空き確認、メール認証状態の確認、認証メールの再送。
/// いずれも1回の認証付きHTTP呼び出しで、ステータスコードを結果に写像する。
use crate::api::auth::{AuthHeader, AuthManager};
use crate::api::client::{ApiClient, ApiResult};
use crate::api::endpoints;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

/// ユーザー名の状態
///
/// Gfycat は不正なユーザー名に 422 を返す。真偽値APIでは「使えない」に
/// まとめるが、区別したい呼び出し側のためにここで分けておく。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameStatus {
    /// 404: 誰も使っていない
    Available,
    /// 2xx: 既に存在する
    Taken,
    /// 422: Gfycat がユーザー名として受け付けない
    Invalid,
}

impl UsernameStatus {
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// 認証メール送信の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationEmail {
    Sent,
    /// 既に認証済みのため送信しなかった
    AlreadyVerified,
}

/// ユーザー名の状態を確認（HEAD /v1/users/{username}）
///
/// 空のユーザー名は通信せずに `Invalid` を返す。それ以外はパーセントエンコードして問い合わせ、
/// 可否の判断は Gfycat に任せる。
///
/// # Errors
/// - 401: `Authentication`
/// - 404 / 422 / 2xx 以外: `Client{status_code}`
pub async fn username_status(
    client: &ApiClient,
    auth: &AuthManager,
    username: &str,
) -> ApiResult<UsernameStatus> {
    if username.is_empty() {
        debug!("empty username, skipping request");
        return Ok(UsernameStatus::Invalid);
    }

    let header = auth.get_auth_header(client).await?;
    let endpoint = endpoints::user(username);
    let response = client.head(&endpoint, Some(&header)).await?;
    let status = response.status();

    debug!(username, status = status.as_u16(), "username check");

    match status {
        StatusCode::NOT_FOUND => Ok(UsernameStatus::Available),
        StatusCode::UNPROCESSABLE_ENTITY => Ok(UsernameStatus::Invalid),
        s if s.is_success() => Ok(UsernameStatus::Taken),
        _ => Err(ApiClient::unexpected_status(response, &endpoint).await),
    }
}

/// ユーザー名が使えるかどうか
///
/// 404 のときだけ true。422（不正なユーザー名）も false になる。
pub async fn check_username_available(
    client: &ApiClient,
    auth: &AuthManager,
    username: &str,
) -> ApiResult<bool> {
    username_status(client, auth, username)
        .await
        .map(UsernameStatus::is_available)
}

/// メールアドレスが認証済みか（GET /v1/me/email_verified）
pub async fn check_email_verified(client: &ApiClient, auth: &AuthManager) -> ApiResult<bool> {
    let header = auth.get_auth_header(client).await?;
    email_verified_with(client, &header).await
}

async fn email_verified_with(client: &ApiClient, header: &AuthHeader) -> ApiResult<bool> {
    let response = client.get(endpoints::EMAIL_VERIFIED, Some(header)).await?;
    let status = response.status();

    debug!(status = status.as_u16(), "email verification status");

    match status {
        s if s.is_success() => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(ApiClient::unexpected_status(response, endpoints::EMAIL_VERIFIED).await),
    }
}

/// 認証メールを送信（POST /v1/me/send_verification_email）
///
/// `check_first` が true で既に認証済みなら何もしない。
/// 確認と送信は同じトークンで行う。
pub async fn send_verification_email(
    client: &ApiClient,
    auth: &AuthManager,
    check_first: bool,
) -> ApiResult<VerificationEmail> {
    let header = auth.get_auth_header(client).await?;

    if check_first && email_verified_with(client, &header).await? {
        info!("email already verified, not sending verification email");
        return Ok(VerificationEmail::AlreadyVerified);
    }

    let response = client
        .post_empty(endpoints::SEND_VERIFICATION_EMAIL, Some(&header))
        .await?;

    if response.status().is_success() {
        info!("verification email sent");
        Ok(VerificationEmail::Sent)
    } else {
        Err(ApiClient::unexpected_status(response, endpoints::SEND_VERIFICATION_EMAIL).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Credentials;
    use crate::api::endpoints::Endpoints;
    use crate::api::error::InfraError;

    struct Fixture {
        server: mockito::ServerGuard,
        client: ApiClient,
        auth: AuthManager,
    }

    async fn fixture() -> Fixture {
        let server = mockito::Server::new_async().await;
        let client = ApiClient::new(Endpoints::new(server.url(), format!("{}/", server.url()))).unwrap();
        let auth = AuthManager::new(Credentials::new("id", "secret", "alice", "hunter2"));
        Fixture { server, client, auth }
    }

    async fn mock_token(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", endpoints::TOKEN)
            .with_status(200)
            .with_body(r#"{"access_token":"T"}"#)
            .create_async()
            .await
    }

    async fn username_result(status: usize) -> ApiResult<bool> {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let _user = f
            .server
            .mock("HEAD", "/v1/users/bob")
            .match_header("authorization", "Bearer T")
            .with_status(status)
            .create_async()
            .await;

        check_username_available(&f.client, &f.auth, "bob").await
    }

    #[tokio::test]
    async fn test_username_available_only_on_404() {
        assert!(username_result(404).await.unwrap());
        assert!(!username_result(200).await.unwrap());
        assert!(!username_result(204).await.unwrap());
        assert!(!username_result(422).await.unwrap());
    }

    #[tokio::test]
    async fn test_username_other_status_is_client_error() {
        match username_result(500).await {
            Err(InfraError::Client { status_code, .. }) => assert_eq!(status_code, 500),
            other => panic!("expected Client error, got {:?}", other),
        }
        assert!(matches!(
            username_result(401).await,
            Err(InfraError::Authentication { .. })
        ));
    }

    #[tokio::test]
    async fn test_username_status_distinguishes_invalid() {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let _user = f
            .server
            .mock("HEAD", "/v1/users/bob")
            .with_status(422)
            .create_async()
            .await;

        let status = username_status(&f.client, &f.auth, "bob").await.unwrap();
        assert_eq!(status, UsernameStatus::Invalid);
    }

    #[tokio::test]
    async fn test_unusual_username_is_sent_encoded() {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let user = f
            .server
            .mock("HEAD", "/v1/users/bad%20name")
            .match_header("authorization", "Bearer T")
            .with_status(422)
            .expect(1)
            .create_async()
            .await;

        let available = check_username_available(&f.client, &f.auth, "bad name").await;
        assert!(!available.unwrap());
        user.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_username_is_invalid_without_request() {
        let mut f = fixture().await;
        let token = f
            .server
            .mock("POST", endpoints::TOKEN)
            .expect(0)
            .create_async()
            .await;

        let status = username_status(&f.client, &f.auth, "").await.unwrap();
        assert_eq!(status, UsernameStatus::Invalid);
        assert!(!check_username_available(&f.client, &f.auth, "").await.unwrap());
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_email_verified_mapping() {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let verified = f
            .server
            .mock("GET", endpoints::EMAIL_VERIFIED)
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let not_verified = f
            .server
            .mock("GET", endpoints::EMAIL_VERIFIED)
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        assert!(check_email_verified(&f.client, &f.auth).await.unwrap());
        assert!(!check_email_verified(&f.client, &f.auth).await.unwrap());
        verified.assert_async().await;
        not_verified.assert_async().await;
    }

    #[tokio::test]
    async fn test_email_verified_other_status() {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let _email = f
            .server
            .mock("GET", endpoints::EMAIL_VERIFIED)
            .with_status(500)
            .create_async()
            .await;

        let result = check_email_verified(&f.client, &f.auth).await;
        assert!(matches!(
            result,
            Err(InfraError::Client { status_code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_send_verification_skipped_when_verified() {
        let mut f = fixture().await;
        let token = mock_token(&mut f.server).await;
        let _email = f
            .server
            .mock("GET", endpoints::EMAIL_VERIFIED)
            .with_status(200)
            .create_async()
            .await;
        let send = f
            .server
            .mock("POST", endpoints::SEND_VERIFICATION_EMAIL)
            .expect(0)
            .create_async()
            .await;

        let result = send_verification_email(&f.client, &f.auth, true).await.unwrap();
        assert_eq!(result, VerificationEmail::AlreadyVerified);
        send.assert_async().await;
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_verification_when_unverified() {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let _email = f
            .server
            .mock("GET", endpoints::EMAIL_VERIFIED)
            .with_status(404)
            .create_async()
            .await;
        let send = f
            .server
            .mock("POST", endpoints::SEND_VERIFICATION_EMAIL)
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let result = send_verification_email(&f.client, &f.auth, true).await.unwrap();
        assert_eq!(result, VerificationEmail::Sent);
        send.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_verification_without_check() {
        let mut f = fixture().await;
        let _token = mock_token(&mut f.server).await;
        let email = f
            .server
            .mock("GET", endpoints::EMAIL_VERIFIED)
            .expect(0)
            .create_async()
            .await;
        let _send = f
            .server
            .mock("POST", endpoints::SEND_VERIFICATION_EMAIL)
            .with_status(429)
            .create_async()
            .await;

        let result = send_verification_email(&f.client, &f.auth, false).await;
        assert!(matches!(
            result,
            Err(InfraError::Client { status_code: 429, .. })
        ));
        email.assert_async().await;
    }
}
