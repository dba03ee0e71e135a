/// プレゼンテーション層: ユーザー入力処理
///
/// 対話入力またはstdinのパイプから認証情報を取得し、
/// コマンド層で使用可能な形式に変換します。
use crate::commands::login::LoginCredentials;
use anyhow::{Context, Result, anyhow, bail};
use std::io::{self, BufRead, Write};

/// 認証情報の各項目（入力順）
const FIELDS: [&str; 4] = ["Client ID", "Client Secret", "Username", "Password"];

/// 対話的に認証情報を取得
pub fn read_credentials_interactive() -> Result<LoginCredentials> {
    eprintln!("Logging in to Gfycat...");
    eprintln!();
    eprintln!("Please enter your Gfycat API client credentials and account login.");
    eprintln!("You can register an API client at: https://developers.gfycat.com/signup/");
    eprintln!();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    read_credentials(&mut input, true)
}

/// stdin からパイプで認証情報を取得（4行形式）
///
/// 形式:
///   1行目: Client ID
///   2行目: Client Secret
///   3行目: Username
///   4行目: Password
pub fn read_credentials_from_stdin() -> Result<LoginCredentials> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    read_credentials(&mut input, false)
}

fn read_credentials<R: BufRead>(input: &mut R, prompt: bool) -> Result<LoginCredentials> {
    let mut values = Vec::with_capacity(FIELDS.len());

    for (line, field) in FIELDS.iter().enumerate() {
        if prompt {
            eprint!("{}: ", field);
            io::stderr().flush()?;
        }

        let mut value = String::new();
        input
            .read_line(&mut value)
            .with_context(|| format!("Failed to read {} from input", field))?;
        let value = value.trim().to_string();

        if value.is_empty() {
            if prompt {
                bail!("{} cannot be empty.", field);
            }
            bail!(
                "{} cannot be empty. Please ensure line {} of stdin contains it.",
                field,
                line + 1
            );
        }
        values.push(value);
    }

    let [client_id, client_secret, username, password]: [String; 4] = values
        .try_into()
        .map_err(|_| anyhow!("Expected {} credential fields", FIELDS.len()))?;

    Ok(LoginCredentials {
        client_id,
        client_secret,
        username,
        password,
    })
}
