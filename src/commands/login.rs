/// ログインコマンド
///
/// Gfycat のクライアントID・シークレットとアカウントのユーザー名・パスワードで
/// トークンが取得できることを確認し、認証情報をconfig.tomlに保存します。
use crate::commands::result::{CommandResult, LoginResult};
use anyhow::{Context, Result};
use gfyeet::api::{Credentials, GfycatClient, auth::mask_secret};
use gfyeet::config::UserConfig;

/// ログイン入力（プレゼンテーション層が取得する）
pub struct LoginCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

/// ログインコマンドを実行
pub async fn execute(credentials: LoginCredentials) -> Result<CommandResult> {
    let LoginCredentials {
        client_id,
        client_secret,
        username,
        password,
    } = credentials;

    let client = GfycatClient::production(Credentials::new(
        client_id.clone(),
        client_secret.clone(),
        username.clone(),
        password.clone(),
    ))
    .context("Failed to create API client")?;

    eprintln!("Verifying credentials...");
    client
        .test_credentials()
        .await
        .context("Authentication failed. Please verify your client credentials, username and password.")?;

    let mut config = UserConfig::load().context("Failed to load configuration file")?;
    let was_logged_in = config.has_auth();
    let masked = mask_secret(&username);

    config.set_auth(client_id, client_secret, username, password);
    config.save().context("Failed to save configuration file")?;

    Ok(CommandResult::Login(LoginResult {
        was_logged_in,
        username: masked,
    }))
}
