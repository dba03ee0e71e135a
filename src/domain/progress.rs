use serde::Serialize;
/// ドメイン層: アップロード進捗イベント定義
///
/// アップロード処理の各段階（枠の確保 → 送信 → エンコード待ち → 完了）を
/// イベントとして表現します。プレゼンテーション層はこれらを受け取り、
/// 人間向けの進捗表示や機械向けのJSON出力に使用します。
use std::time::SystemTime;

/// アップロード処理の各段階を表すイベント
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UploadPhase {
    /// ファイル検証開始
    ValidatingFile { file_path: String },

    /// ファイル検証完了
    FileValidated {
        file_name: String,
        size_bytes: u64,
        format: String,
    },

    /// アップロード枠を要求中
    RequestingSlot { file_name: String },

    /// アップロード枠（gfy id）を確保
    SlotReserved { gfy_id: String },

    /// ファイル送信開始
    UploadingFile { file_name: String, gfy_id: String },

    /// ファイル送信完了
    FileUploaded { file_name: String, size_bytes: u64 },

    /// エンコード状態を確認した
    Encoding {
        gfy_id: String,
        attempt: u32,
        elapsed_secs: u64,
    },

    /// エンコード完了
    Completed { gfy_id: String },
}

/// アップロード進捗情報
#[derive(Debug, Clone, Serialize)]
pub struct UploadProgress {
    /// 処理段階
    #[serde(flatten)]
    pub phase: UploadPhase,
    /// イベント発生時刻
    #[serde(skip)]
    pub timestamp: SystemTime,
}

impl UploadProgress {
    /// 新しい進捗情報を作成
    pub fn new(phase: UploadPhase) -> Self {
        Self {
            phase,
            timestamp: SystemTime::now(),
        }
    }
}
