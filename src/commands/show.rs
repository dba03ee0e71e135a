use crate::commands::client_from_config;
use crate::commands::result::{CommandResult, ShowResult};
use anyhow::{Context, Result};
use gfyeet::InfraError;

/// gfy の詳細を表示するコマンドを実行する
///
/// 存在しない gfy（404）は `InfraError::NotFound` として報告する。
pub async fn execute(gfy_id: &str) -> Result<CommandResult> {
    let client = client_from_config()?;

    let lookup = client
        .fetch_metadata(gfy_id)
        .await
        .context("Failed to fetch gfy details")?;

    let gfy = lookup
        .into_metadata()
        .ok_or_else(|| InfraError::not_found(gfy_id))?;

    let page_url = gfy
        .url
        .clone()
        .unwrap_or_else(|| client.page_url(&gfy.gfy_id));

    Ok(CommandResult::Show(ShowResult { page_url, gfy }))
}
