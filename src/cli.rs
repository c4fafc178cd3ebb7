use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::api::HttpApi;
use crate::app::{Page, Views};
use crate::config::Config;
use crate::drop_zone::{pasted_gesture, DropEvent};
use crate::error::AppError;
use crate::models::SelectedFile;
use crate::terminal::Terminal;
use crate::upload::UploadOutcome;

#[derive(Parser)]
#[command(
    name = "dropshare",
    about = "DropShare: drop files onto a shared file server",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the file server
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Delay before the list refreshes after a successful upload
    #[arg(long, global = true)]
    pub refresh_delay_ms: Option<u64>,

    /// Cancel an in-flight upload when a new one starts
    #[arg(long, global = true)]
    pub supersede: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive drop zone: drag files onto the terminal or paste their paths
    Share,

    /// Show the files available on the server
    #[command(visible_alias = "ls")]
    List,

    /// Upload a file (only the first one given is sent)
    #[command(visible_alias = "put")]
    Upload {
        /// Local file paths, or `-` to read the file from standard input
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// File name to upload standard input under
        #[arg(long, default_value = "stdin")]
        name: String,
    },
}

impl Cli {
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(server) = &self.server {
            config.server = server.clone();
        }
        if let Some(ms) = self.refresh_delay_ms {
            config.refresh_delay = Duration::from_millis(ms);
        }
        if self.supersede {
            config.supersede_uploads = true;
        }
        config
    }
}

/// Runs one invocation. Must be driven inside a `LocalSet`.
pub async fn run_cli(cli: Cli) -> Result<(), AppError> {
    let config = cli.config();
    let api = Rc::new(HttpApi::new(&config.server, config.chunk_size)?);
    tracing::info!("Using file server at {}", api.base());

    let terminal = Rc::new(Terminal::new(api.base().clone()));
    let views = Views {
        list: terminal.clone(),
        status: terminal.clone(),
        progress: terminal.clone(),
        drop_target: terminal.clone(),
    };
    let page = Page::new(api, views, &config);

    match cli.command.unwrap_or(Commands::Share) {
        Commands::Share => share(&page, &terminal).await,

        Commands::List => {
            page.load().await;
            Ok(())
        }

        Commands::Upload { files, name } => {
            let picked = pick_files(files, &name, tokio::io::stdin()).await?;
            let Some(first) = picked.first().cloned() else {
                return Ok(());
            };
            if let Some(path) = first.path() {
                if !path.is_file() {
                    return Err(AppError::FileNotFound(path.display().to_string()));
                }
            }

            page.on_pick(picked);
            if page.wait_idle().await.contains(&UploadOutcome::Succeeded) {
                Ok(())
            } else {
                Err(AppError::UploadFailed(first.name))
            }
        }
    }
}

async fn share(page: &Page<HttpApi>, terminal: &Terminal) -> Result<(), AppError> {
    page.load().await;
    println!("Drag a file onto this window (or paste its path) and press Enter.");
    println!("Commands: ls, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", terminal.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            // Input closed: any drag in progress is over
            page.on_drop_event(DropEvent::DragEnd);
            break;
        };
        match line.trim() {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "ls" | "refresh" => page.refresh().await,
            pasted => {
                for event in pasted_gesture(pasted) {
                    page.on_drop_event(event);
                }
            }
        }
    }

    let outcomes = page.wait_idle().await;
    tracing::debug!(uploads = outcomes.len(), "Drop zone closed");
    Ok(())
}

/// Turns picked paths into files. A leading `-` is read fully from `stdin`; only
/// the first file is ever uploaded, so later entries stay as plain paths.
async fn pick_files<R: AsyncRead + Unpin>(
    paths: Vec<PathBuf>,
    stdin_name: &str,
    mut stdin: R,
) -> Result<Vec<SelectedFile>, AppError> {
    let mut picked = Vec::with_capacity(paths.len());
    for (i, path) in paths.into_iter().enumerate() {
        if i == 0 && path.as_os_str() == "-" {
            let mut data = Vec::new();
            stdin.read_to_end(&mut data).await?;
            tracing::debug!(bytes = data.len(), "Read upload from standard input");
            picked.push(SelectedFile::from_bytes(stdin_name, data));
        } else {
            picked.push(SelectedFile::from_path(path));
        }
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "dropshare",
            "--server",
            "http://share.lan:9000",
            "--refresh-delay-ms",
            "250",
            "--supersede",
            "ls",
        ]);
        let config = cli.config();
        assert_eq!(config.server, "http://share.lan:9000");
        assert_eq!(config.refresh_delay, Duration::from_millis(250));
        assert!(config.supersede_uploads);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn upload_accepts_several_files() {
        let cli = Cli::parse_from(["dropshare", "put", "a.txt", "b.txt"]);
        match cli.command {
            Some(Commands::Upload { files, name }) => {
                assert_eq!(files.len(), 2);
                assert_eq!(name, "stdin");
            }
            _ => panic!("expected upload"),
        }
        assert!(Cli::try_parse_from(["dropshare", "upload"]).is_err());
    }

    #[test]
    fn no_command_means_share() {
        let cli = Cli::parse_from(["dropshare"]);
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn dash_reads_first_file_from_stdin() {
        let picked = pick_files(
            vec![PathBuf::from("-"), PathBuf::from("other.txt")],
            "notes.md",
            &b"# piped notes"[..],
        )
        .await
        .unwrap();

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].name, "notes.md");
        assert!(picked[0].path().is_none());
        assert!(matches!(
            &picked[0].source,
            crate::models::FileSource::Memory(data) if &data[..] == b"# piped notes"
        ));
        assert_eq!(picked[1].path(), Some(std::path::Path::new("other.txt")));
    }

    #[tokio::test]
    async fn paths_are_not_read_eagerly() {
        let picked = pick_files(vec![PathBuf::from("/no/such/file.bin")], "stdin", &b""[..])
            .await
            .unwrap();
        assert_eq!(picked[0].name, "file.bin");
        assert_eq!(picked[0].path(), Some(std::path::Path::new("/no/such/file.bin")));
    }

    #[test]
    fn stdin_name_flag() {
        let cli = Cli::parse_from(["dropshare", "upload", "-", "--name", "dump.sql"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Upload { ref files, ref name }) if files[0] == PathBuf::from("-") && name == "dump.sql"
        ));
    }
}
