//! ドメイン層
//!
//! HTTP に依存しない値オブジェクトとルール（入力検証、メタデータ、進捗イベント）。

pub mod error;
pub mod formatter;
pub mod metadata;
pub mod progress;
pub mod validator;
