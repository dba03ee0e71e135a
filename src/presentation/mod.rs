/// プレゼンテーション層モジュール
///
/// ライブラリの結果とUI表示の橋渡しを行います。
///
/// # モジュール
/// - `input`: 認証情報の入力
/// - `output`: コマンド結果・エラー・進捗の出力（人間向け・機械向け）
/// - `progress`: アップロード進捗のDTO変換
pub mod input;
pub mod output;
pub mod progress;
