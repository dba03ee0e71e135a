// Gfycat API client module
//
// 認証（パスワードグラント）、アカウント系エンドポイント、
// アップロード（枠の確保 → 送信 → エンコード待ち）、メタデータ取得。

pub mod account;
pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod gfycat;
pub mod metadata;
pub mod types;
pub mod upload;

pub use account::{UsernameStatus, VerificationEmail};
pub use auth::{AuthHeader, AuthManager, Credentials};
pub use client::{ApiClient, ApiResult};
pub use endpoints::Endpoints;
pub use error::InfraError;
pub use gfycat::GfycatClient;
pub use upload::{PollPolicy, UploadRequest, UploadStatus};

pub use crate::domain::metadata::MetadataLookup;
