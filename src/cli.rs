use crate::commands::{self, CommandResult, upload::UploadOptions};
use crate::presentation::{input, output};
use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// CLI引数を解析し、適切なコマンドにディスパッチする
///
/// `args` は `--machine` を除いた引数（先頭はプログラム名）。
pub async fn run(args: &[String], machine_output: bool) -> Result<()> {
    let Some(command) = args.get(1) else {
        output::print_usage();
        return Ok(());
    };
    let rest = &args[2..];

    let result = match command.as_str() {
        "login" => {
            let credentials = if has_flag(rest, "--stdin") {
                input::read_credentials_from_stdin()?
            } else {
                input::read_credentials_interactive()?
            };
            commands::login::execute(credentials)
                .await
                .context("Login command failed")?
        }
        "logout" => commands::logout::execute()
            .await
            .context("Logout command failed")?,
        "status" => commands::status::execute()
            .await
            .context("Status command failed")?,
        "upload" => run_upload(rest, machine_output).await?,
        "show" => {
            let gfy_id = positional(rest).context("Please specify a gfy id for show command")?;
            commands::show::execute(gfy_id)
                .await
                .context("Show command failed")?
        }
        "username" => {
            let username =
                positional(rest).context("Please specify a username for username command")?;
            commands::username::execute(username)
                .await
                .context("Username command failed")?
        }
        "email-status" => commands::email::status()
            .await
            .context("Email status command failed")?,
        "send-verification" => commands::email::send_verification(has_flag(rest, "--force"))
            .await
            .context("Send verification command failed")?,
        "help" | "--help" | "-h" => commands::help::execute().await?,
        _ => bail!(
            "Unknown command: '{}'. Use 'help' to see available commands.",
            command
        ),
    };

    output::output_result(&result, machine_output)
}

async fn run_upload(args: &[String], machine_output: bool) -> Result<CommandResult> {
    let (file_path, options, show_progress) = parse_upload_args(args)?;

    // Ctrl-C でエンコード待ちを中断する
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received SIGINT, cancelling upload");
            trigger.cancel();
        }
    });

    let result = commands::upload::execute(&file_path, &options, &cancel, |progress| {
        if show_progress {
            output::output_progress(&progress, machine_output);
        }
    })
    .await
    .context("Upload command failed");

    ctrl_c.abort();
    result
}

fn parse_upload_args(args: &[String]) -> Result<(String, UploadOptions, bool)> {
    let mut file_path = None;
    let mut options = UploadOptions::default();
    let mut show_progress = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--title" => {
                options.title = Some(iter.next().context("--title requires a value")?.clone());
            }
            "--description" => {
                options.description = Some(
                    iter.next()
                        .context("--description requires a value")?
                        .clone(),
                );
            }
            "--public" => options.public = true,
            "--allow-duplicates" => options.allow_duplicates = true,
            "--progress" => show_progress = true,
            flag if flag.starts_with("--") => bail!("Unknown option for upload: '{}'", flag),
            path if file_path.is_none() => file_path = Some(path.to_string()),
            extra => bail!("Unexpected argument for upload: '{}'", extra),
        }
    }

    let file_path = file_path.context("Please specify a file path for upload command")?;
    Ok((file_path, options, show_progress))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// 最初のフラグ以外の引数
fn positional(args: &[String]) -> Option<&str> {
    args.iter()
        .map(String::as_str)
        .find(|a| !a.starts_with("--"))
}
