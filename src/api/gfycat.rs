/// Gfycat クライアント
///
/// 認証情報とHTTPクライアントを1つにまとめ、全ての操作を公開する。
/// 各操作は呼び出しごとに新しいトークンを取得する（キャッシュしない）。
use crate::api::account::{self, UsernameStatus, VerificationEmail};
use crate::api::auth::{AuthHeader, AuthManager, Credentials};
use crate::api::client::{ApiClient, ApiResult};
use crate::api::endpoints::Endpoints;
use crate::api::error::InfraError;
use crate::api::metadata;
use crate::api::upload::{self, PollPolicy, UploadRequest};
use crate::domain::metadata::MetadataLookup;
use crate::domain::progress::UploadProgress;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone)]
pub struct GfycatClient {
    client: ApiClient,
    auth: AuthManager,
    poll_policy: PollPolicy,
}

impl GfycatClient {
    /// 任意のエンドポイントに向けたクライアントを作成
    pub fn new(credentials: Credentials, endpoints: Endpoints) -> ApiResult<Self> {
        Ok(Self {
            client: ApiClient::new(endpoints)?,
            auth: AuthManager::new(credentials),
            poll_policy: PollPolicy::default(),
        })
    }

    /// 本番の Gfycat に向けたクライアントを作成
    pub fn production(credentials: Credentials) -> ApiResult<Self> {
        Self::new(credentials, Endpoints::production())
    }

    pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        self.auth.credentials()
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll_policy
    }

    /// 新しいトークンを取得し `Authorization` ヘッダーを返す
    pub async fn auth_header(&self) -> ApiResult<AuthHeader> {
        self.auth.get_auth_header(&self.client).await
    }

    /// 認証情報が通るか確認する
    pub async fn test_credentials(&self) -> ApiResult<()> {
        self.auth.test_credentials(&self.client).await
    }

    pub async fn check_username_available(&self, username: &str) -> ApiResult<bool> {
        account::check_username_available(&self.client, &self.auth, username).await
    }

    pub async fn username_status(&self, username: &str) -> ApiResult<UsernameStatus> {
        account::username_status(&self.client, &self.auth, username).await
    }

    pub async fn check_email_verified(&self) -> ApiResult<bool> {
        account::check_email_verified(&self.client, &self.auth).await
    }

    pub async fn send_verification_email(&self, check_first: bool) -> ApiResult<VerificationEmail> {
        account::send_verification_email(&self.client, &self.auth, check_first).await
    }

    /// gfy のメタデータを取得（404 は `MetadataLookup::Invalid`）
    pub async fn fetch_metadata(&self, gfy_id: &str) -> ApiResult<MetadataLookup> {
        metadata::fetch_metadata(&self.client, &self.auth, gfy_id).await
    }

    /// ファイルをアップロードし、エンコード完了まで待つ
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        request: &UploadRequest,
    ) -> ApiResult<MetadataLookup> {
        self.upload_file_with(path, request, &CancellationToken::new(), |_| {})
            .await
    }

    /// キャンセルと進捗通知付きのアップロード
    ///
    /// 形式やサイズの判定は Gfycat に任せる。読めないファイルは `Io` になる。
    /// `cancel` はどの段階でも有効で、`InfraError::Cancelled` で終わる。
    pub async fn upload_file_with<F>(
        &self,
        path: impl AsRef<Path>,
        request: &UploadRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> ApiResult<MetadataLookup>
    where
        F: FnMut(UploadProgress),
    {
        let path = path.as_ref();
        let file_name = upload::file_name_of(path);

        info!(file_name = %file_name, "starting upload");

        let upload = upload::upload_file(
            &self.client,
            &self.auth,
            path,
            request,
            &self.poll_policy,
            cancel,
            on_progress,
        );

        // 送信中のキャンセルはリクエストごと破棄する
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(InfraError::cancelled(format!("upload of {}", file_name)))
            }
            result = upload => result,
        }
    }

    /// gfy の公開ページURL
    pub fn page_url(&self, gfy_id: &str) -> String {
        self.client.endpoints().page_url(gfy_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::domain::progress::UploadPhase;
    use std::io::Write;
    use std::time::Duration;

    async fn setup() -> (mockito::ServerGuard, GfycatClient) {
        let server = mockito::Server::new_async().await;
        let client = GfycatClient::new(
            Credentials::new("id", "secret", "alice", "hunter2"),
            Endpoints::new(server.url(), format!("{}/", server.url())),
        )
        .unwrap()
        .with_poll_policy(PollPolicy {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        });
        (server, client)
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GfycatClient>();
    }

    #[test]
    fn test_page_url() {
        let client =
            GfycatClient::production(Credentials::new("id", "secret", "alice", "hunter2")).unwrap();
        assert_eq!(client.page_url("abc123"), "https://gfycat.com/abc123");
        assert_eq!(client.poll_policy(), &PollPolicy::default());
    }

    #[tokio::test]
    async fn test_auth_header_uses_issued_token() {
        let (mut server, client) = setup().await;
        let _token = server
            .mock("POST", endpoints::TOKEN)
            .with_status(200)
            .with_body(r#"{"access_token":"T"}"#)
            .create_async()
            .await;

        let header = client.auth_header().await.unwrap();
        assert_eq!(header.value(), "Bearer T");
    }

    #[tokio::test]
    async fn test_rejected_credentials_fail_every_operation() {
        let (mut server, client) = setup().await;
        let _token = server
            .mock("POST", endpoints::TOKEN)
            .with_status(401)
            .create_async()
            .await;
        let others = server
            .mock("GET", mockito::Matcher::Regex("^/v1/(me|gfycats)/".to_string()))
            .expect(0)
            .create_async()
            .await;
        let heads = server
            .mock("HEAD", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let posts = server
            .mock("POST", mockito::Matcher::Regex("^/(v1/(gfycats|me/)|$)".to_string()))
            .expect(0)
            .create_async()
            .await;

        let mut video = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        video.write_all(b"data").unwrap();

        let is_auth = |e: &InfraError| matches!(e, InfraError::Authentication { .. });

        assert!(is_auth(&client.check_username_available("bob").await.unwrap_err()));
        assert!(is_auth(&client.check_email_verified().await.unwrap_err()));
        assert!(is_auth(&client.send_verification_email(true).await.unwrap_err()));
        assert!(is_auth(&client.fetch_metadata("abc123").await.unwrap_err()));
        assert!(is_auth(
            &client
                .upload_file(video.path(), &UploadRequest::default())
                .await
                .unwrap_err()
        ));

        others.assert_async().await;
        heads.assert_async().await;
        posts.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_leaves_format_checks_to_gfycat() {
        let (mut server, client) = setup().await;
        let token = server
            .mock("POST", endpoints::TOKEN)
            .with_status(200)
            .with_body(r#"{"access_token":"T"}"#)
            .expect(1)
            .create_async()
            .await;
        let slot = server
            .mock("POST", endpoints::GFYCATS)
            .with_status(403)
            .expect(1)
            .create_async()
            .await;

        let mut video = tempfile::Builder::new().suffix(".m4v").tempfile().unwrap();
        video.write_all(b"data").unwrap();

        let result = client.upload_file(video.path(), &UploadRequest::default()).await;
        assert!(matches!(
            result,
            Err(InfraError::Client { status_code: 403, .. })
        ));
        token.assert_async().await;
        slot.assert_async().await;
    }

    #[tokio::test]
    async fn test_cancelled_upload_sends_nothing() {
        let (mut server, client) = setup().await;
        let token = server
            .mock("POST", endpoints::TOKEN)
            .expect(0)
            .create_async()
            .await;

        let mut video = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        video.write_all(b"data").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = client
            .upload_file_with(video.path(), &UploadRequest::default(), &cancel, |_| {})
            .await;

        assert!(matches!(result, Err(InfraError::Cancelled { .. })));
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_starts_with_slot_request() {
        let (mut server, client) = setup().await;
        let _token = server
            .mock("POST", endpoints::TOKEN)
            .with_status(401)
            .create_async()
            .await;

        let mut video = tempfile::Builder::new().suffix(".webm").tempfile().unwrap();
        video.write_all(b"0123456789").unwrap();

        let mut phases = Vec::new();
        let result = client
            .upload_file_with(
                video.path(),
                &UploadRequest::default(),
                &CancellationToken::new(),
                |p| phases.push(p.phase),
            )
            .await;

        assert!(matches!(result, Err(InfraError::Authentication { .. })));
        assert_eq!(phases.len(), 1);
        assert!(matches!(phases[0], UploadPhase::RequestingSlot { .. }));
    }
}
