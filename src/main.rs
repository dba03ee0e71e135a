mod cli;
mod commands;
mod presentation;

use gfyeet::config::{APP_CONFIG, UserConfig};
use gfyeet::config::error::ConfigError;
use gfyeet::domain::error::DomainError;
use gfyeet::InfraError;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let (flags, args): (Vec<String>, Vec<String>) = env::args().partition(|a| a == "--machine");
    let machine_output = !flags.is_empty();

    init_tracing();

    if let Err(e) = cli::run(&args, machine_output).await {
        handle_error(e, machine_output);
    }
}

/// ログ出力を初期化（stderr）
///
/// フィルタは RUST_LOG → config.toml の log_level → 既定値 の順に決まる。
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = UserConfig::load()
            .ok()
            .and_then(|c| c.log_level)
            .unwrap_or_else(|| APP_CONFIG.logging.default_level.to_string());
        EnvFilter::try_new(&level)
            .unwrap_or_else(|_| EnvFilter::new(APP_CONFIG.logging.default_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// エラーハンドリングとユーザーへの表示
///
/// anyhow::Error から元のエラー型を downcast して、
/// エラーの種類に応じた exit code とヒントを決定する。
fn handle_error(error: anyhow::Error, machine_output: bool) {
    let exit_code = determine_exit_code(&error);
    let hint = get_error_hint(&error);

    presentation::output::output_error(&error, exit_code, hint, machine_output);

    std::process::exit(exit_code);
}

/// エラーチェーンから適切な終了コードを決定
fn determine_exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            return domain_err.severity().exit_code();
        }
        if let Some(infra_err) = cause.downcast_ref::<InfraError>() {
            return infra_err.severity().exit_code();
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_err.severity().exit_code();
        }
    }

    1
}

/// エラーに対するユーザー向けヒントを取得
fn get_error_hint(error: &anyhow::Error) -> Option<&str> {
    error.chain().find_map(|cause| {
        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            domain_err.hint()
        } else if let Some(infra_err) = cause.downcast_ref::<InfraError>() {
            infra_err.hint()
        } else if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            config_err.hint()
        } else {
            None
        }
    })
}
