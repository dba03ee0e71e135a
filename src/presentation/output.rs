/// プレゼンテーション層: コマンド結果の出力
///
/// コマンド実行結果をユーザー向け（人間可読、stderr）または
/// 機械向け（JSON、stdout）形式で出力する責務を担います。
/// CLI使用方法・エラー・進捗の表示もこのモジュールが担当します。
use crate::commands::result::CommandResult;
use crate::presentation::progress::{DisplayProgress, ProgressCategory};
use anyhow::Result;
use gfyeet::GfyMetadata;
use gfyeet::api::{UsernameStatus, VerificationEmail};
use gfyeet::config::UserConfig;
use gfyeet::domain::formatter::{format_size_mb, format_timestamp};
use gfyeet::domain::progress::UploadProgress;

/// ヘルプテキスト（単一の情報源）
const HELP_TEXT: &str = "gfyeet
Upload videos to Gfycat from the command line

Usage:
  gfyeet [--machine] <command> [args...]

Global Flags:
  --machine        - Output machine-readable JSON to stdout (for scripting)
                     Works for both success and error cases

Available commands:
  login [--stdin]  - Login to Gfycat
                     Without --stdin: Interactive credential input (default)
                     With --stdin: Read credentials from standard input
                                   Format: client id, client secret,
                                           username, password (one per line)
  logout           - Remove stored credentials
  status           - Check authentication status
  upload <file> [--title T] [--description D] [--public]
                [--allow-duplicates] [--progress]
                   - Upload a video and wait for Gfycat to encode it
                     --public: List the gfy in the public gallery
                     --allow-duplicates: Create a new gfy even if the same
                                         file was uploaded before
                     --progress: Show upload progress
                     Ctrl-C stops waiting for encoding
  show <gfy_id>    - Show details of a gfy
  username <name>  - Check whether a username is available
  email-status     - Check whether your email address is verified
  send-verification [--force]
                   - Send the email verification mail
                     --force: Send even if already verified
  help             - Display this help message

Environment:
  RUST_LOG         - Log filter (overrides log_level in config.toml)

Machine-Readable Output:
  --machine status               - JSON output for success
  printf 'id\\nsecret\\nuser\\npass\\n' | gfyeet --machine login --stdin
                                 - Automated login with JSON response

Error Output:
  Normal mode:   Human-readable error messages to stderr
  --machine:     JSON error object with exit_code and hint fields

Progress Output:
  upload --progress              - Show human-readable progress to stderr
  --machine upload --progress    - Output machine-readable JSON progress to stdout";

/// コマンド使用方法を表示する
pub fn print_usage() {
    eprintln!("{}", HELP_TEXT);
}

/// コマンド結果を適切な形式で出力する
///
/// * `machine_output = false`: 人間向けの詳細メッセージ（stderr）
/// * `machine_output = true`: 機械可読JSON（stdout）
pub fn output_result(result: &CommandResult, machine_output: bool) -> Result<()> {
    if machine_output {
        output_machine_readable(result)
    } else {
        output_human_readable(result);
        Ok(())
    }
}

/// アップロード進捗を出力する
pub fn output_progress(progress: &UploadProgress, machine_output: bool) {
    if machine_output {
        match serde_json::to_string(&serde_json::json!({ "progress": progress })) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!(error = %e, "failed to serialize progress event"),
        }
    } else if let Some(display) = DisplayProgress::from_progress(progress) {
        match display.category {
            ProgressCategory::Completed => eprintln!("✓ {}", display.message),
            _ => eprintln!("{}", display.message),
        }
    }
}

/// エラーを出力する
///
/// 機械向けモードでは `{"success": false, "error": ..., "exit_code": ..., "hint": ...}` を
/// stdout に出力する。
pub fn output_error(error: &anyhow::Error, exit_code: i32, hint: Option<&str>, machine_output: bool) {
    if machine_output {
        let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
        let json = serde_json::json!({
            "success": false,
            "error": error.to_string(),
            "causes": causes,
            "exit_code": exit_code,
            "hint": hint,
        });
        println!("{}", json);
        return;
    }

    eprintln!("Error: {}", error);

    let chain: Vec<_> = error.chain().skip(1).collect();
    if !chain.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            eprintln!("  {}: {}", i + 1, cause);
        }
    }

    if let Some(hint) = hint {
        eprintln!("\nHint: {}", hint);
    }
}

fn output_human_readable(result: &CommandResult) {
    match result {
        CommandResult::Login(r) => {
            eprintln!();
            if r.was_logged_in {
                eprintln!("✓ Login credentials updated!");
            } else {
                eprintln!("Login successful.");
            }
            eprintln!("Credentials for {} have been saved.", r.username);
        }
        CommandResult::Logout(r) => {
            if r.was_logged_in {
                eprintln!("Logged out successfully.");
                eprintln!("Authentication credentials have been removed.");
            } else {
                eprintln!("Already logged out.");
            }
        }
        CommandResult::Status(r) => match (&r.username, r.is_authenticated) {
            (Some(username), true) => {
                eprintln!("Authenticated");
                eprintln!("Username: {}", username);
                eprintln!();
                eprintln!("Your credentials are valid and working.");
            }
            (Some(username), false) => {
                eprintln!("✗ Authentication failed");
                eprintln!("  Username: {}", username);
                eprintln!();
                eprintln!("Your credentials may be invalid.");
                eprintln!("Please run 'gfyeet login' to update your credentials.");
            }
            (None, _) => {
                eprintln!("Not logged in");
                eprintln!("No authentication credentials found.");
                eprintln!("Please run 'gfyeet login' to authenticate.");
            }
        },
        CommandResult::Upload(r) => {
            eprintln!("\nUpload completed successfully!");
            eprintln!("---");
            eprintln!("Gfy ID:   {}", r.gfy_id);
            eprintln!("File:     {} ({}, {})", r.file_path, format_size_mb(r.file_size), r.file_format);
            eprintln!("Page URL: {}", r.page_url);
            match &r.metadata {
                Some(gfy) => print_media_urls(gfy),
                None => eprintln!("\nNote: metadata is not available yet. Try 'gfyeet show {}' later.", r.gfy_id),
            }
            eprintln!("---");
        }
        CommandResult::Show(r) => print_gfy_details(&r.gfy, &r.page_url),
        CommandResult::Username(r) => match r.status {
            UsernameStatus::Available => eprintln!("✓ '{}' is available.", r.username),
            UsernameStatus::Taken => eprintln!("✗ '{}' is already taken.", r.username),
            UsernameStatus::Invalid => {
                eprintln!("✗ '{}' is not accepted as a username by Gfycat.", r.username)
            }
        },
        CommandResult::EmailStatus(r) => {
            if r.verified {
                eprintln!("✓ Your email address is verified.");
            } else {
                eprintln!("✗ Your email address is not verified.");
                eprintln!("Run 'gfyeet send-verification' to receive a verification mail.");
            }
        }
        CommandResult::SendVerification(r) => match r.outcome {
            VerificationEmail::Sent => eprintln!("✓ Verification email sent."),
            VerificationEmail::AlreadyVerified => {
                eprintln!("Your email address is already verified. No email was sent.");
                eprintln!("Use --force to send it anyway.");
            }
        },
        CommandResult::Help => print_usage(),
    }
}

fn print_media_urls(gfy: &GfyMetadata) {
    let urls = [
        ("MP4", &gfy.mp4_url),
        ("WebM", &gfy.webm_url),
        ("GIF", &gfy.gif_url),
        ("Mobile", &gfy.mobile_url),
        ("Poster", &gfy.poster_url),
    ];
    for (label, url) in urls {
        if let Some(url) = url {
            eprintln!("{:<9} {}", format!("{}:", label), url);
        }
    }
}

fn print_gfy_details(gfy: &GfyMetadata, page_url: &str) {
    // タイムゾーン設定が読めなければUTCで表示
    let offset = UserConfig::load()
        .map(|c| c.timezone_offset_seconds)
        .unwrap_or(0);

    eprintln!();
    eprintln!("Gfy Details:");
    eprintln!("============");
    eprintln!("Gfy ID:         {}", gfy.gfy_id);
    eprintln!("Name:           {}", gfy.gfy_name);
    if let Some(title) = &gfy.title {
        eprintln!("Title:          {}", title);
    }
    if let Some(description) = gfy.description.as_deref().filter(|d| !d.is_empty()) {
        eprintln!("Description:    {}", description);
    }
    if let Some(user) = &gfy.user_name {
        eprintln!("User:           {}", user);
    }
    if let Some(created) = gfy.create_date {
        eprintln!("Created:        {}", format_timestamp(created, offset));
    }
    if !gfy.tags.is_empty() {
        let tags: Vec<&str> = gfy.tags.iter().map(String::as_str).collect();
        eprintln!("Tags:           {}", tags.join(", "));
    }
    eprintln!("NSFW:           {}", if gfy.nsfw { "yes" } else { "no" });

    eprintln!();
    eprintln!("Video:");
    eprintln!("------");
    if let (Some(width), Some(height)) = (gfy.width, gfy.height) {
        eprintln!("Size:           {}x{}", width, height);
    }
    if let Some(frame_rate) = gfy.frame_rate {
        eprintln!("Frame Rate:     {:.2} fps", frame_rate);
    }
    if let Some(mp4_size) = gfy.mp4_size {
        eprintln!("MP4 Size:       {}", format_size_mb(mp4_size));
    }
    if let Some(has_audio) = gfy.has_audio {
        eprintln!("Audio:          {}", if has_audio { "yes" } else { "no" });
    }

    eprintln!();
    eprintln!("Stats:");
    eprintln!("------");
    eprintln!("Views:          {}", gfy.views.unwrap_or(0));
    eprintln!("Likes:          {}", gfy.likes.unwrap_or(0));
    eprintln!("Dislikes:       {}", gfy.dislikes.unwrap_or(0));

    eprintln!();
    eprintln!("URLs:");
    eprintln!("-----");
    eprintln!("Page:     {}", page_url);
    print_media_urls(gfy);
    eprintln!();
}

fn output_machine_readable(result: &CommandResult) -> Result<()> {
    let mut json = serde_json::to_value(result)?;
    if let Some(object) = json.as_object_mut() {
        object.insert("success".to_string(), serde_json::Value::Bool(true));
    }

    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}
