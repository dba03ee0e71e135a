/// ファイルパーミッション管理モジュール
///
/// config.toml には Gfycat のパスワードとクライアントシークレットが
/// 平文で保存されるため、所有者のみが読み書きできるようにします。
///
/// Unix系 (Linux, macOS): 0600 (rw-------)
/// Windows: プロファイル配下の既定ACLに任せる
use crate::config::error::ConfigError;
use std::path::Path;

/// 認証情報ファイルのパーミッションを所有者のみに制限
///
/// # Errors
/// ファイルが存在しない場合、またはパーミッション設定に失敗した場合に
/// ConfigError を返します。
pub fn restrict_credentials_file(file_path: &Path) -> Result<(), ConfigError> {
    if !file_path.exists() {
        return Err(ConfigError::file_system(
            format!("Credentials file not found: {}", file_path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File does not exist"),
        ));
    }

    #[cfg(unix)]
    {
        set_unix_permissions(file_path)
    }

    #[cfg(windows)]
    {
        set_windows_permissions(file_path)
    }

    #[cfg(not(any(unix, windows)))]
    {
        Ok(())
    }
}

#[cfg(unix)]
fn set_unix_permissions(file_path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    let permissions = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(file_path, permissions).map_err(|e| {
        ConfigError::file_system(
            format!(
                "Failed to restrict permissions (0600) on credentials file: {}",
                file_path.display()
            ),
            e,
        )
    })
}

/// %APPDATA% 配下は既定で現在のユーザーのみがアクセスできる。
/// 読み取り専用属性が付いていると次回の保存に失敗するため、それだけ外す。
#[cfg(windows)]
fn set_windows_permissions(file_path: &Path) -> Result<(), ConfigError> {
    let metadata = std::fs::metadata(file_path).map_err(|e| {
        ConfigError::file_system(
            format!("Failed to read metadata: {}", file_path.display()),
            e,
        )
    })?;
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        std::fs::set_permissions(file_path, permissions).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to clear read-only flag: {}", file_path.display()),
                e,
            )
        })?;
    }
    Ok(())
}
