/// アップロードコマンド
///
/// ファイルを検証してから Gfycat へ送り、エンコード完了を待ってメタデータを返す。
use crate::commands::client_from_config;
use crate::commands::result::{CommandResult, UploadResult};
use anyhow::{Context, Result};
use gfyeet::api::UploadRequest;
use gfyeet::domain::progress::{UploadPhase, UploadProgress};
use gfyeet::domain::validator;
use tokio_util::sync::CancellationToken;

/// `upload` の引数
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    /// 公開ギャラリーに載せる
    pub public: bool,
    /// 同一ファイルでも新しい gfy を作る
    pub allow_duplicates: bool,
}

impl UploadOptions {
    fn to_request(&self) -> UploadRequest {
        let defaults = UploadRequest::default();
        UploadRequest {
            title: self.title.clone().unwrap_or(defaults.title),
            description: self.description.clone().unwrap_or(defaults.description),
            private: !self.public,
            no_md5: self.allow_duplicates,
        }
    }
}

/// アップロードコマンドを実行する
///
/// # 引数
/// * `file_path` - アップロード対象の動画ファイルのパス
/// * `cancel` - キャンセルされるとエンコード待ちを中断する
/// * `on_progress` - 進捗イベントの受け取り先
pub async fn execute<F>(
    file_path: &str,
    options: &UploadOptions,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<CommandResult>
where
    F: FnMut(UploadProgress),
{
    // 認証より先に検証し、ファイルの誤りは未ログインでも報告する
    on_progress(UploadProgress::new(UploadPhase::ValidatingFile {
        file_path: file_path.to_string(),
    }));
    let validation =
        validator::validate_upload_file(file_path).context("File validation failed")?;
    on_progress(UploadProgress::new(UploadPhase::FileValidated {
        file_name: validation.file_name.clone(),
        size_bytes: validation.size,
        format: validation.extension.clone(),
    }));

    let client = client_from_config()?;

    let mut completed_id = None;
    let lookup = client
        .upload_file_with(file_path, &options.to_request(), cancel, |progress| {
            if let UploadPhase::Completed { gfy_id } = &progress.phase {
                completed_id = Some(gfy_id.clone());
            }
            on_progress(progress);
        })
        .await
        .context("Failed to upload file to Gfycat")?;

    // メタデータが 404 でも完成した gfy 自体は存在する
    let metadata = lookup.into_metadata();
    let gfy_id = metadata
        .as_ref()
        .map(|gfy| gfy.gfy_id.clone())
        .or(completed_id)
        .context("Upload finished without a gfy id")?;

    let page_url = metadata
        .as_ref()
        .and_then(|gfy| gfy.url.clone())
        .unwrap_or_else(|| client.page_url(&gfy_id));

    Ok(CommandResult::Upload(UploadResult {
        page_url,
        gfy_id,
        file_path: validation.path,
        file_size: validation.size,
        file_format: validation.extension,
        metadata,
    }))
}
