/// アップロード処理
///
/// 1. アップロード枠の確保（POST /v1/gfycats → gfyname）
/// 2. file drop ホストへ multipart でファイルを送信
/// 3. エンコード完了までステータスをポーリング
/// 4. 完成した gfy のメタデータを取得
///
/// どの段階で失敗しても処理はそこで終わる。確保済みの枠は取り消さない。
use crate::api::auth::{AuthHeader, AuthManager};
use crate::api::client::{ApiClient, ApiResult};
use crate::api::endpoints;
use crate::api::error::InfraError;
use crate::api::metadata;
use crate::api::types::{FileDropResponse, UploadSlotResponse, UploadStatusResponse, describe_error};
use crate::config::APP_CONFIG;
use crate::domain::metadata::MetadataLookup;
use crate::domain::progress::{UploadPhase, UploadProgress};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// アップロード枠を要求する際のパラメータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    /// 公開ギャラリーに載せない
    pub private: bool,
    /// 同一ファイルの重複チェックを省略する
    #[serde(rename = "noMd5")]
    pub no_md5: bool,
}

impl Default for UploadRequest {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            description: "Description".to_string(),
            private: true,
            no_md5: true,
        }
    }
}

/// ステータスポーリングの間隔と上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// 1未満は1として扱う
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(APP_CONFIG.upload.poll_interval_seconds),
            max_attempts: APP_CONFIG.upload.max_poll_attempts,
        }
    }
}

/// エンコード状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// "complete" 以外の途中状態はすべてここ
    Encoding,
    /// 完了。重複検出時は既存 gfy の名前が入る
    Complete { gfy_name: Option<String> },
    /// Gfycat が id を知らない（"NotFoundo" または 404）
    NotFound,
    /// エンコード失敗（"error"）
    Failed { message: String },
}

impl UploadStatus {
    fn from_response(response: UploadStatusResponse, endpoint: &str) -> ApiResult<Self> {
        let task = response
            .task
            .ok_or_else(|| InfraError::malformed(endpoint, "status response has no 'task' field"))?;

        Ok(match task.as_str() {
            "complete" => Self::Complete {
                gfy_name: response.gfyname.filter(|name| !name.is_empty()),
            },
            "NotFoundo" => Self::NotFound,
            "error" => Self::Failed {
                message: response
                    .error_message
                    .as_ref()
                    .map(describe_error)
                    .unwrap_or_else(|| "encoding failed".to_string()),
            },
            _ => Self::Encoding,
        })
    }
}

/// ファイルをアップロードし、エンコード完了後のメタデータを返す
///
/// # Arguments
/// * `cancel` - ポーリング待機中にキャンセルされると `Cancelled` で終わる
/// * `on_progress` - 各段階の進捗イベントを受け取る
pub async fn upload_file<F>(
    client: &ApiClient,
    auth: &AuthManager,
    path: &Path,
    request: &UploadRequest,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> ApiResult<MetadataLookup>
where
    F: FnMut(UploadProgress),
{
    let file_name = file_name_of(path);

    on_progress(UploadProgress::new(UploadPhase::RequestingSlot {
        file_name: file_name.clone(),
    }));
    let header = auth.get_auth_header(client).await?;
    let gfy_id = request_slot(client, &header, request).await?;
    on_progress(UploadProgress::new(UploadPhase::SlotReserved {
        gfy_id: gfy_id.clone(),
    }));

    on_progress(UploadProgress::new(UploadPhase::UploadingFile {
        file_name: file_name.clone(),
        gfy_id: gfy_id.clone(),
    }));
    let size_bytes = send_file(client, &gfy_id, path).await?;
    on_progress(UploadProgress::new(UploadPhase::FileUploaded {
        file_name,
        size_bytes,
    }));

    let final_id = wait_for_encoding(client, &gfy_id, policy, cancel, &mut on_progress).await?;
    on_progress(UploadProgress::new(UploadPhase::Completed {
        gfy_id: final_id.clone(),
    }));

    // エンコードに時間がかかるとトークンが失効しうるので取り直す
    let header = auth.get_auth_header(client).await?;
    metadata::fetch_metadata_with(client, &header, &final_id).await
}

/// アップロード枠を確保し、gfy id を返す
pub async fn request_slot(
    client: &ApiClient,
    header: &AuthHeader,
    request: &UploadRequest,
) -> ApiResult<String> {
    let response = client.post(endpoints::GFYCATS, request, Some(header)).await?;

    if response.status() != StatusCode::OK {
        return Err(ApiClient::unexpected_status(response, endpoints::GFYCATS).await);
    }

    let slot: UploadSlotResponse = ApiClient::parse_json(response, endpoints::GFYCATS).await?;

    if let Some(error) = &slot.error {
        return Err(InfraError::malformed(endpoints::GFYCATS, describe_error(error)));
    }

    let gfy_id = slot
        .gfyname
        .filter(|name| !name.is_empty())
        .ok_or_else(|| InfraError::malformed(endpoints::GFYCATS, "gfyname is missing"))?;

    info!(gfy_id = %gfy_id, "upload slot reserved");
    Ok(gfy_id)
}

/// ファイルを file drop ホストへ送信し、送信したバイト数を返す
///
/// フォームは `key`（gfy id）→ `file` の順。
pub async fn send_file(client: &ApiClient, gfy_id: &str, path: &Path) -> ApiResult<u64> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| InfraError::io(format!("Failed to read {}", path.display()), e))?;
    let size_bytes = bytes.len() as u64;

    debug!(gfy_id, size_bytes, "sending file to file drop");

    let part = Part::bytes(bytes).file_name(file_name_of(path));
    let form = Form::new().text("key", gfy_id.to_string()).part("file", part);

    let response = client
        .post_multipart(form)
        .await
        .map_err(|e| InfraError::upload(format!("Failed to send file: {}", e), None))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| {
            InfraError::upload(
                format!("Failed to read file drop response: {}", e),
                Some(status.as_u16()),
            )
        })?;

    if status != StatusCode::OK {
        return Err(InfraError::upload(
            format!("file drop returned HTTP {}: {}", status.as_u16(), body.trim()),
            Some(status.as_u16()),
        ));
    }

    // 成功時のボディは空か、JSON以外のこともある
    if let Ok(FileDropResponse { error: Some(error) }) = serde_json::from_str::<FileDropResponse>(&body) {
        return Err(InfraError::upload(describe_error(&error), Some(status.as_u16())));
    }

    info!(gfy_id, size_bytes, "file uploaded");
    Ok(size_bytes)
}

/// エンコード状態を1回取得
pub async fn fetch_status(client: &ApiClient, gfy_id: &str) -> ApiResult<UploadStatus> {
    let endpoint = endpoints::upload_status(gfy_id);
    let response = client.get(&endpoint, None).await?;

    match response.status() {
        StatusCode::OK => {}
        StatusCode::NOT_FOUND => return Ok(UploadStatus::NotFound),
        _ => return Err(ApiClient::unexpected_status(response, &endpoint).await),
    }

    let body: UploadStatusResponse = ApiClient::parse_json(response, &endpoint).await?;
    UploadStatus::from_response(body, &endpoint)
}

/// "complete" になるまでポーリングし、完成した gfy の id を返す
///
/// 終端状態を受け取った後は待機しない（待機回数 = ポーリング回数 - 1）。
pub async fn wait_for_encoding<F>(
    client: &ApiClient,
    gfy_id: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    on_progress: &mut F,
) -> ApiResult<String>
where
    F: FnMut(UploadProgress),
{
    let max_attempts = policy.max_attempts.max(1);
    let started = Instant::now();

    for attempt in 1..=max_attempts {
        if cancel.is_cancelled() {
            return Err(InfraError::cancelled(format!("waiting for encoding of {}", gfy_id)));
        }

        let status = fetch_status(client, gfy_id).await?;
        debug!(gfy_id, attempt, status = ?status, "encoding status");

        on_progress(UploadProgress::new(UploadPhase::Encoding {
            gfy_id: gfy_id.to_string(),
            attempt,
            elapsed_secs: started.elapsed().as_secs(),
        }));

        match status {
            UploadStatus::Complete { gfy_name } => {
                let final_id = match gfy_name {
                    Some(name) if name != gfy_id => {
                        info!(gfy_id, existing = %name, "duplicate detected, using existing gfy");
                        name
                    }
                    _ => gfy_id.to_string(),
                };
                return Ok(final_id);
            }
            UploadStatus::NotFound => return Err(InfraError::not_found(gfy_id)),
            UploadStatus::Failed { message } => {
                warn!(gfy_id, %message, "encoding failed");
                return Err(InfraError::upload(message, None));
            }
            UploadStatus::Encoding => {}
        }

        if attempt == max_attempts {
            break;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(InfraError::cancelled(format!("waiting for encoding of {}", gfy_id)));
            }
            _ = tokio::time::sleep(policy.interval) => {}
        }
    }

    Err(InfraError::PollTimeout {
        gfy_id: gfy_id.to_string(),
        attempts: max_attempts,
    })
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("video")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Credentials;
    use crate::api::endpoints::Endpoints;
    use crate::domain::metadata::fixtures::GFY_ITEM_JSON;
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

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

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(50),
            max_attempts,
        }
    }

    fn video_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(b"fake video bytes").unwrap();
        file
    }

    async fn mock_status(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/v1/gfycats/fetch/status/abc123")
            .with_status(200)
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    #[test]
    fn test_upload_request_defaults() {
        let value = serde_json::to_value(UploadRequest::default()).unwrap();
        assert_eq!(
            value,
            json!({"title": "Title", "description": "Description", "private": true, "noMd5": true})
        );
    }

    #[tokio::test]
    async fn test_end_to_end_upload() {
        let mut f = fixture().await;
        let video = video_file();

        let token = f
            .server
            .mock("POST", endpoints::TOKEN)
            .with_status(200)
            .with_body(r#"{"access_token":"T"}"#)
            .expect(2)
            .create_async()
            .await;
        let slot = f
            .server
            .mock("POST", endpoints::GFYCATS)
            .match_header("authorization", "Bearer T")
            .match_body(Matcher::Json(json!({
                "title": "Title", "description": "Description", "private": true, "noMd5": true
            })))
            .with_status(200)
            .with_body(r#"{"isOk":true,"gfyname":"abc123","secret":"s"}"#)
            .expect(1)
            .create_async()
            .await;
        let filedrop = f
            .server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"key\"".to_string()),
                Matcher::Regex("abc123".to_string()),
                Matcher::Regex("fake video bytes".to_string()),
            ]))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let encoding = mock_status(&mut f.server, r#"{"task":"encoding","time":10}"#).await;
        let complete = mock_status(&mut f.server, r#"{"task":"complete","gfyname":"abc123"}"#).await;
        let meta = f
            .server
            .mock("GET", "/v1/gfycats/abc123")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(GFY_ITEM_JSON)
            .expect(1)
            .create_async()
            .await;

        let mut events = Vec::new();
        let started = Instant::now();
        let lookup = upload_file(
            &f.client,
            &f.auth,
            video.path(),
            &UploadRequest::default(),
            &fast_policy(10),
            &CancellationToken::new(),
            |p| events.push(p.phase),
        )
        .await
        .expect("upload should complete");

        let gfy = lookup.into_metadata().expect("valid metadata");
        let expected: serde_json::Value = serde_json::from_str(GFY_ITEM_JSON).unwrap();
        let expected: crate::domain::metadata::GfyMetadata =
            serde_json::from_value(expected["gfyItem"].clone()).unwrap();
        assert_eq!(gfy, expected);

        // 2回ポーリングし、待機は1回だけ
        let polls = events
            .iter()
            .filter(|e| matches!(e, UploadPhase::Encoding { .. }))
            .count();
        assert_eq!(polls, 2);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(matches!(events.first(), Some(UploadPhase::RequestingSlot { .. })));
        assert!(matches!(events.last(), Some(UploadPhase::Completed { .. })));

        token.assert_async().await;
        slot.assert_async().await;
        filedrop.assert_async().await;
        encoding.assert_async().await;
        complete.assert_async().await;
        meta.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_upload_makes_no_further_calls() {
        let mut f = fixture().await;
        let video = video_file();

        let _token = f
            .server
            .mock("POST", endpoints::TOKEN)
            .with_status(401)
            .create_async()
            .await;
        let slot = f
            .server
            .mock("POST", endpoints::GFYCATS)
            .expect(0)
            .create_async()
            .await;
        let filedrop = f.server.mock("POST", "/").expect(0).create_async().await;

        let result = upload_file(
            &f.client,
            &f.auth,
            video.path(),
            &UploadRequest::default(),
            &fast_policy(3),
            &CancellationToken::new(),
            |_| {},
        )
        .await;

        assert!(matches!(result, Err(InfraError::Authentication { .. })));
        slot.assert_async().await;
        filedrop.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_slot_without_gfyname_is_malformed() {
        let mut f = fixture().await;
        let _slot = f
            .server
            .mock("POST", endpoints::GFYCATS)
            .with_status(200)
            .with_body(r#"{"isOk":true}"#)
            .create_async()
            .await;

        let result = request_slot(&f.client, &AuthHeader::bearer("T"), &UploadRequest::default()).await;
        assert!(matches!(result, Err(InfraError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_request_slot_rejected() {
        let mut f = fixture().await;
        let _slot = f
            .server
            .mock("POST", endpoints::GFYCATS)
            .with_status(400)
            .create_async()
            .await;

        let result = request_slot(&f.client, &AuthHeader::bearer("T"), &UploadRequest::default()).await;
        assert!(matches!(
            result,
            Err(InfraError::Client { status_code: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_send_file_error_field_is_upload_error() {
        let mut f = fixture().await;
        let video = video_file();
        let _drop = f
            .server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"error":"bad key"}"#)
            .create_async()
            .await;

        match send_file(&f.client, "abc123", video.path()).await {
            Err(InfraError::Upload { message, .. }) => assert_eq!(message, "bad key"),
            other => panic!("expected Upload error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_file_non_200_is_upload_error() {
        let mut f = fixture().await;
        let video = video_file();
        let _drop = f.server.mock("POST", "/").with_status(403).create_async().await;

        let result = send_file(&f.client, "abc123", video.path()).await;
        assert!(matches!(
            result,
            Err(InfraError::Upload { status_code: Some(403), .. })
        ));
    }

    #[tokio::test]
    async fn test_send_file_missing_file_is_io_error() {
        let f = fixture().await;
        let result = send_file(&f.client, "abc123", Path::new("/no/such/video.mp4")).await;
        assert!(matches!(result, Err(InfraError::Io { .. })));
    }

    #[tokio::test]
    async fn test_send_file_unreachable_drop_is_upload_error() {
        let f = fixture().await;
        let client = ApiClient::new(Endpoints::new(f.server.url(), "http://127.0.0.1:1/")).unwrap();
        let video = video_file();

        let result = send_file(&client, "abc123", video.path()).await;
        assert!(matches!(
            result,
            Err(InfraError::Upload { status_code: None, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_task_fails_fast() {
        let mut f = fixture().await;
        let status = mock_status(&mut f.server, r#"{"time":3}"#).await;

        let result = wait_for_encoding(
            &f.client,
            "abc123",
            &fast_policy(10),
            &CancellationToken::new(),
            &mut |_| {},
        )
        .await;

        assert!(matches!(result, Err(InfraError::MalformedResponse { .. })));
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_gives_up_after_max_attempts() {
        let mut f = fixture().await;
        let status = f
            .server
            .mock("GET", "/v1/gfycats/fetch/status/abc123")
            .with_status(200)
            .with_body(r#"{"task":"encoding"}"#)
            .expect(3)
            .create_async()
            .await;

        let result = wait_for_encoding(
            &f.client,
            "abc123",
            &PollPolicy {
                interval: Duration::from_millis(1),
                max_attempts: 3,
            },
            &CancellationToken::new(),
            &mut |_| {},
        )
        .await;

        assert!(matches!(
            result,
            Err(InfraError::PollTimeout { attempts: 3, .. })
        ));
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_cancelled_while_waiting() {
        let mut f = fixture().await;
        let _status = f
            .server
            .mock("GET", "/v1/gfycats/fetch/status/abc123")
            .with_status(200)
            .with_body(r#"{"task":"encoding"}"#)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = wait_for_encoding(
            &f.client,
            "abc123",
            &PollPolicy {
                interval: Duration::from_secs(60),
                max_attempts: 10,
            },
            &cancel,
            &mut |_| {},
        )
        .await;

        assert!(matches!(result, Err(InfraError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut f = fixture().await;
        let _status = mock_status(&mut f.server, r#"{"task":"NotFoundo"}"#).await;

        let result = wait_for_encoding(
            &f.client,
            "abc123",
            &fast_policy(5),
            &CancellationToken::new(),
            &mut |_| {},
        )
        .await;
        assert!(matches!(result, Err(InfraError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_encoding_error_is_upload_error() {
        let mut f = fixture().await;
        let _status = mock_status(
            &mut f.server,
            r#"{"task":"error","errorMessage":{"code":"Invalid","description":"unsupported codec"}}"#,
        )
        .await;

        match fetch_status(&f.client, "abc123").await {
            Ok(UploadStatus::Failed { message }) => assert_eq!(message, "unsupported codec"),
            other => panic!("expected Failed status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_resolves_to_existing_gfy() {
        let mut f = fixture().await;
        let _status = mock_status(&mut f.server, r#"{"task":"complete","gfyname":"ExistingGfy"}"#).await;

        let final_id = wait_for_encoding(
            &f.client,
            "abc123",
            &fast_policy(5),
            &CancellationToken::new(),
            &mut |_| {},
        )
        .await
        .unwrap();
        assert_eq!(final_id, "ExistingGfy");
    }
}
