use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cipherdocs_core::config_file::{self, Settings};
use cipherdocs_core::extract::ProgressFn;
use cipherdocs_core::intake::{self, IntakeError};
use cipherdocs_core::session::{INVALID_FILE_TYPE_MESSAGE, PROCESSING_FAILED_MESSAGE};
use cipherdocs_core::{ExtractError, Progress};
use cipherdocs_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// CipherDocs - Extract plain text from PDF files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF, page by page
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Write the text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also save the text as extracted-text-<date>.txt in the download directory
        #[arg(long)]
        download: bool,

        /// Directory for --download (overrides config and CIPHERDOCS_DOWNLOAD_DIR)
        #[arg(long)]
        download_dir: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            file_path,
            output,
            download,
            download_dir,
            no_color,
            quiet,
        } => extract(file_path, output, download, download_dir, no_color, quiet).await,
    }
}

async fn extract(
    file_path: PathBuf,
    output: Option<PathBuf>,
    download: bool,
    download_dir: Option<PathBuf>,
    no_color: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut settings = Settings::resolve(&config_file::load_config());
    if let Some(dir) = download_dir {
        settings.download_dir = dir;
    }

    let color = ColorMode(!no_color);

    match intake::validate(&file_path) {
        Ok(()) => {}
        Err(IntakeError::InvalidFileType { declared, .. }) => {
            tracing::debug!(path = %file_path.display(), declared = %declared, "file rejected");
            let declared = if declared.is_empty() {
                "unknown".to_string()
            } else {
                declared
            };
            anyhow::bail!(
                "{} ({}: {})",
                INVALID_FILE_TYPE_MESSAGE,
                file_path.display(),
                declared
            );
        }
        Err(e) => return Err(e.into()),
    }

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.green/dim}] {percent}%")?
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    };

    let progress: ProgressFn = {
        let bar = bar.clone();
        Arc::new(move |p: Progress| {
            bar.set_position(u64::from(p.percent));
            bar.set_message(p.message);
        })
    };

    let cancel = CancellationToken::new();

    // Set up Ctrl+C handler
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let result =
        cipherdocs_core::extract_file(&file_path, Arc::new(MupdfBackend::new()), progress, &cancel)
            .await;
    bar.finish_and_clear();

    let text = extraction_outcome(&file_path, result)?;

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let mut stderr = std::io::stderr();
    if let Some(ref output_path) = output {
        std::fs::write(output_path, &text)?;
        tracing::debug!(path = %output_path.display(), bytes = text.len(), "wrote output file");
        output::print_saved(&mut stderr, output_path, color)?;
    } else {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
    }

    if download {
        let saved =
            cipherdocs_core::save_text(&settings.download_dir, cipherdocs_core::actions::today(), &text)?;
        output::print_saved(&mut stderr, &saved, color)?;
    }

    if !quiet {
        output::print_summary(&mut stderr, &file_name, &text, color)?;
    }

    Ok(())
}

/// The extracted text, or the error to exit with. Failures are logged.
fn extraction_outcome(
    file_path: &Path,
    result: Result<String, ExtractError>,
) -> anyhow::Result<String> {
    match result {
        Ok(text) => Ok(text),
        Err(ExtractError::Cancelled) => {
            tracing::info!(path = %file_path.display(), "extraction interrupted");
            anyhow::bail!("Interrupted")
        }
        Err(e) => {
            tracing::warn!(path = %file_path.display(), error = %e, "error processing PDF");
            Err(anyhow::Error::new(e).context(PROCESSING_FAILED_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use cipherdocs_core::BackendError;

    use super::*;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (out, logs)
    }

    #[test]
    fn fatal_extraction_error_is_logged() {
        let (err, logs) = with_captured_logs(|| {
            extraction_outcome(
                Path::new("broken.pdf"),
                Err(ExtractError::Parse(BackendError::OpenError(
                    "not a PDF".into(),
                ))),
            )
            .unwrap_err()
        });

        assert_eq!(err.to_string(), PROCESSING_FAILED_MESSAGE);
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("error processing PDF"), "logs: {logs}");
        assert!(logs.contains("broken.pdf"), "logs: {logs}");
    }

    #[test]
    fn interruption_is_logged_and_reported() {
        let (err, logs) = with_captured_logs(|| {
            extraction_outcome(Path::new("a.pdf"), Err(ExtractError::Cancelled)).unwrap_err()
        });

        assert_eq!(err.to_string(), "Interrupted");
        assert!(logs.contains("extraction interrupted"), "logs: {logs}");
    }

    #[test]
    fn text_passes_through() {
        let text = extraction_outcome(Path::new("a.pdf"), Ok("--- Page 1 ---\n\nhi".into())).unwrap();
        assert_eq!(text, "--- Page 1 ---\n\nhi");
    }
}
