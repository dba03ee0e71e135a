/// ドメインサービス: 入力バリデーション
///
/// アップロード対象のファイル、ユーザー名、gfy id をリクエスト前に検証する。
/// 設定値（最大ファイルサイズ、サポート形式）はAPP_CONFIGから取得します。
use crate::config::APP_CONFIG;
use crate::domain::error::DomainError;
use std::path::Path;

/// ファイルのバリデーション結果
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub path: String,
    pub file_name: String,
    pub size: u64,
    pub extension: String,
}

/// アップロード対象のファイルをバリデーションする
///
/// # エラー
/// - ファイルが存在しない
/// - ディレクトリが指定された
/// - ファイルが空
/// - ファイルサイズが制限を超過
/// - サポートされていない形式
pub fn validate_upload_file(file_path: &str) -> Result<ValidationResult, DomainError> {
    let path = Path::new(file_path);

    if !path.exists() {
        return Err(DomainError::file_not_found(file_path));
    }

    let metadata = std::fs::metadata(path).map_err(|_| DomainError::file_not_found(file_path))?;

    if metadata.is_dir() {
        return Err(DomainError::not_a_file(file_path));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(DomainError::empty_file(file_path));
    }

    let max_file_size = APP_CONFIG.upload.max_file_size;
    if size > max_file_size {
        return Err(DomainError::FileTooLarge {
            size,
            max: max_file_size,
        });
    }

    let supported_formats = APP_CONFIG.upload.supported_formats;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| DomainError::invalid_format(file_path, supported_formats, "no extension"))?;

    if !supported_formats.contains(&extension.as_str()) {
        return Err(DomainError::invalid_format(
            file_path,
            supported_formats,
            extension.clone(),
        ));
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path)
        .to_string();

    Ok(ValidationResult {
        path: file_path.to_string(),
        file_name,
        size,
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_supported_formats() {
        let formats = APP_CONFIG.upload.supported_formats;
        assert!(formats.contains(&"mp4"));
        assert!(formats.contains(&"mov"));
        assert!(formats.contains(&"webm"));
    }

    #[test]
    fn test_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Clip.MP4");
        fs::write(&path, b"not really a video").unwrap();

        let result = validate_upload_file(path.to_str().unwrap()).expect("valid file");
        assert_eq!(result.file_name, "Clip.MP4");
        assert_eq!(result.extension, "mp4");
        assert_eq!(result.size, 18);
    }

    #[test]
    fn test_missing_file() {
        let result = validate_upload_file("/definitely/not/here.mp4");
        assert!(matches!(result, Err(DomainError::FileNotFound { .. })));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = TempDir::new().unwrap();
        let result = validate_upload_file(dir.path().to_str().unwrap());
        assert!(matches!(result, Err(DomainError::NotAFile { .. })));
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.mp4");
        fs::write(&path, b"").unwrap();

        let result = validate_upload_file(path.to_str().unwrap());
        assert!(matches!(result, Err(DomainError::EmptyFile { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        match validate_upload_file(path.to_str().unwrap()) {
            Err(DomainError::InvalidFormat { found, .. }) => assert_eq!(found, "txt"),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }
}
