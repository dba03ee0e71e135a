//! Gfycat API クライアントライブラリ
//!
//! パスワードグラントで認証し、アップロード枠の確保・動画ファイルの送信・
//! エンコード完了待ち・メタデータ取得までを行う。
//! アカウント系のエンドポイント（ユーザー名の空き確認、メール認証状態、
//! 認証メール再送）も提供する。
//!
//! ```no_run
//! use gfyeet::api::{Credentials, GfycatClient, UploadRequest};
//!
//! # async fn run() -> Result<(), gfyeet::api::InfraError> {
//! let client = GfycatClient::production(Credentials::new(
//!     "client_id", "client_secret", "username", "password",
//! ))?;
//! let lookup = client.upload_file("video.mp4", &UploadRequest::default()).await?;
//! if let Some(gfy) = lookup.metadata() {
//!     println!("{}", gfy.gfy_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error_severity;

pub use api::{Credentials, GfycatClient, InfraError, MetadataLookup};
pub use domain::metadata::GfyMetadata;
