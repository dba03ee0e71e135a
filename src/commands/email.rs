/// メール認証コマンド
///
/// `email-status` は認証状態の確認、`send-verification` は認証メールの送信。
use crate::commands::client_from_config;
use crate::commands::result::{CommandResult, EmailStatusResult, SendVerificationResult};
use anyhow::{Context, Result};

pub async fn status() -> Result<CommandResult> {
    let client = client_from_config()?;

    let verified = client
        .check_email_verified()
        .await
        .context("Failed to check email verification status")?;

    Ok(CommandResult::EmailStatus(EmailStatusResult { verified }))
}

/// 認証メールを送信する
///
/// `force` が false なら、既に認証済みのときは送信しない。
pub async fn send_verification(force: bool) -> Result<CommandResult> {
    let client = client_from_config()?;

    let outcome = client
        .send_verification_email(!force)
        .await
        .context("Failed to send verification email")?;

    Ok(CommandResult::SendVerification(SendVerificationResult {
        outcome,
    }))
}
