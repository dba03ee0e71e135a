/// プレゼンテーション層: アップロード進捗表示DTO
///
/// ドメイン層の`UploadProgress`をUI表示に適した形式に変換します。
/// 借用して変換し、表示しない更新は`None`で表します。
use gfyeet::domain::formatter::format_size_mb;
use gfyeet::domain::progress::{UploadPhase, UploadProgress};

/// エンコード待ちの表示間隔（ポーリング回数）
const ENCODING_REPORT_EVERY: u32 = 6;

/// 進捗表示のカテゴリ
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressCategory {
    Validation,
    /// アップロード枠の確保
    Preparation,
    Upload,
    /// エンコード待ち
    Processing,
    Completed,
}

/// プレゼンテーション層用の進捗情報
#[derive(Debug, Clone)]
pub struct DisplayProgress {
    pub message: String,
    pub category: ProgressCategory,
}

impl DisplayProgress {
    pub fn new(message: String, category: ProgressCategory) -> Self {
        Self { message, category }
    }
}

impl DisplayProgress {
    /// ドメイン層の進捗イベントから表示用の情報を作る
    ///
    /// # 戻り値
    /// - `Some(DisplayProgress)`: 表示すべき進捗情報
    /// - `None`: 表示を抑制（エンコード待ちの途中経過）
    pub fn from_progress(progress: &UploadProgress) -> Option<Self> {
        match &progress.phase {
            UploadPhase::ValidatingFile { file_path } => Some(Self::new(
                format!("Validating file: {}", file_path),
                ProgressCategory::Validation,
            )),
            UploadPhase::FileValidated {
                file_name,
                size_bytes,
                format,
            } => Some(Self::new(
                format!(
                    "File validated: {} ({}, {})",
                    file_name,
                    format_size_mb(*size_bytes),
                    format
                ),
                ProgressCategory::Validation,
            )),
            UploadPhase::RequestingSlot { file_name } => Some(Self::new(
                format!("Requesting upload slot for: {}", file_name),
                ProgressCategory::Preparation,
            )),
            UploadPhase::SlotReserved { gfy_id } => Some(Self::new(
                format!("Upload slot reserved (gfy id: {})", gfy_id),
                ProgressCategory::Preparation,
            )),
            UploadPhase::UploadingFile { file_name, .. } => Some(Self::new(
                format!("Uploading file: {}...", file_name),
                ProgressCategory::Upload,
            )),
            UploadPhase::FileUploaded {
                file_name,
                size_bytes,
            } => Some(Self::new(
                format!("File uploaded: {} ({})", file_name, format_size_mb(*size_bytes)),
                ProgressCategory::Upload,
            )),
            UploadPhase::Encoding {
                attempt,
                elapsed_secs,
                ..
            } => format_encoding(*attempt, *elapsed_secs),
            UploadPhase::Completed { gfy_id } => Some(Self::new(
                format!("Encoding complete: {}", gfy_id),
                ProgressCategory::Completed,
            )),
        }
    }
}

fn format_encoding(attempt: u32, elapsed_secs: u64) -> Option<DisplayProgress> {
    if attempt == 1 {
        Some(DisplayProgress::new(
            "Waiting for Gfycat to encode the video...".to_string(),
            ProgressCategory::Processing,
        ))
    } else if attempt % ENCODING_REPORT_EVERY == 0 {
        Some(DisplayProgress::new(
            format!("Still encoding... ({}s elapsed)", elapsed_secs),
            ProgressCategory::Processing,
        ))
    } else {
        None
    }
}
