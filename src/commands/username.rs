use crate::commands::client_from_config;
use crate::commands::result::{CommandResult, UsernameResult};
use anyhow::{Context, Result};

/// ユーザー名が使えるか確認するコマンドを実行する
pub async fn execute(username: &str) -> Result<CommandResult> {
    let client = client_from_config()?;

    let status = client
        .username_status(username)
        .await
        .with_context(|| format!("Failed to check username '{}'", username))?;

    Ok(CommandResult::Username(UsernameResult {
        username: username.to_string(),
        available: status.is_available(),
        status,
    }))
}
