use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cipherdocs_core::{ExtractOptions, PdfBackend};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Serve backend commands until the command channel closes.
///
/// At most one extraction is live: a new `Extract` cancels the previous one
/// before starting, and `CancelExtraction` cancels whatever is running.
pub async fn listen(
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    backend: Arc<dyn PdfBackend>,
    options: ExtractOptions,
) {
    // Per-extraction cancel token
    let mut current = CancellationToken::new();

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::Extract { path, generation } => {
                current.cancel();
                current = CancellationToken::new();

                tracing::info!(generation, path = %path.display(), "starting extraction");
                // Spawn separately so we can still receive commands
                tokio::spawn(cipherdocs_core::run_extraction(
                    path,
                    generation,
                    backend.clone(),
                    options.clone(),
                    event_tx.clone(),
                    current.clone(),
                ));
            }
            BackendCommand::CancelExtraction => {
                tracing::debug!("cancelling extraction");
                current.cancel();
            }
        }
    }

    current.cancel();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use cipherdocs_core::DriverEvent;
    use cipherdocs_core::mock::{MockBackend, MockPage};

    use super::*;

    fn write_pdf(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4 mock").unwrap();
        path
    }

    fn options() -> ExtractOptions {
        ExtractOptions {
            completion_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn extract_command_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir);
        let backend = Arc::new(MockBackend::new(vec![MockPage::text(&["Hello", "world"])]));

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        tokio::spawn(listen(cmd_rx, event_tx, backend, options()));

        cmd_tx
            .send(BackendCommand::Extract {
                path,
                generation: 7,
            })
            .unwrap();

        let text = loop {
            match event_rx.recv().await {
                Some(DriverEvent::Complete { generation, text }) => {
                    assert_eq!(generation, 7);
                    break text;
                }
                Some(DriverEvent::Progress { generation, .. }) => assert_eq!(generation, 7),
                other => panic!("unexpected event: {other:?}"),
            }
        };
        assert_eq!(text, "--- Page 1 ---\n\nHello world");
    }

    #[tokio::test]
    async fn cancel_command_stops_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir);
        let backend = Arc::new(
            MockBackend::new(vec![MockPage::text(&["a"]); 50])
                .with_delay(Duration::from_millis(20)),
        );

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        tokio::spawn(listen(cmd_rx, event_tx, backend, options()));

        cmd_tx
            .send(BackendCommand::Extract {
                path,
                generation: 1,
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        cmd_tx.send(BackendCommand::CancelExtraction).unwrap();

        // Drain until the channel goes quiet; no completion may arrive.
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(300), event_rx.recv()).await
        {
            assert!(
                matches!(event, DriverEvent::Progress { .. }),
                "unexpected event after cancel: {event:?}"
            );
        }
    }

    #[tokio::test]
    async fn new_extraction_supersedes_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir);
        let backend = Arc::new(
            MockBackend::new(vec![MockPage::text(&["x"]); 20])
                .with_delay(Duration::from_millis(10)),
        );

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        tokio::spawn(listen(cmd_rx, event_tx, backend, options()));

        cmd_tx
            .send(BackendCommand::Extract {
                path: path.clone(),
                generation: 1,
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        cmd_tx
            .send(BackendCommand::Extract {
                path,
                generation: 2,
            })
            .unwrap();

        loop {
            match event_rx.recv().await {
                Some(DriverEvent::Complete { generation, .. }) => {
                    assert_eq!(generation, 2);
                    break;
                }
                Some(DriverEvent::Failed { error, .. }) => panic!("failed: {error}"),
                Some(DriverEvent::Progress { .. }) => {}
                None => panic!("channel closed"),
            }
        }
    }
}
