//! Actions on the finished text: copy to clipboard and save as a file.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("nothing to copy")]
    Empty,
    #[error("clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("download directory not found: {}", .0.display())]
    MissingDir(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to move file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// OSC 52 "set clipboard" escape sequence carrying `text`.
///
/// Understood by Ghostty, iTerm2, kitty, WezTerm, tmux (with
/// `set-clipboard on`) and most modern terminals.
pub fn osc52_sequence(text: &str) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

/// Write `text` to the terminal clipboard through `out`.
pub fn copy_to_clipboard<W: Write>(out: &mut W, text: &str) -> Result<(), ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()?;
    tracing::debug!(bytes = text.len(), "copied text via OSC 52");
    Ok(())
}

/// `extracted-text-YYYY-MM-DD.txt` for `date`.
pub fn download_filename(date: NaiveDate) -> String {
    format!("extracted-text-{}.txt", date.format("%Y-%m-%d"))
}

/// Today's (UTC) calendar date.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Save `text` verbatim into `dir` under [`download_filename`] for `date`.
///
/// The content goes to a temporary file in `dir` first and is renamed
/// into place, so a partially written download never appears. An existing
/// file with the same name is replaced.
pub fn save_text(dir: &Path, date: NaiveDate, text: &str) -> Result<PathBuf, SaveError> {
    if !dir.is_dir() {
        return Err(SaveError::MissingDir(dir.to_path_buf()));
    }
    let path = dir.join(download_filename(date));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&path)?;

    tracing::info!(path = %path.display(), bytes = text.len(), "saved extracted text");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(download_filename(date), "extracted-text-2024-03-07.txt");
    }

    #[test]
    fn today_filename_has_expected_shape() {
        let name = download_filename(today());
        assert!(name.starts_with("extracted-text-"));
        assert!(name.ends_with(".txt"));
        let date = &name["extracted-text-".len()..name.len() - 4];
        assert_eq!(date.len(), 10);
        assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn osc52_wraps_base64() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn copy_writes_sequence() {
        let mut out = Vec::new();
        copy_to_clipboard(&mut out, "hello").unwrap();
        assert_eq!(out, osc52_sequence("hello").into_bytes());
    }

    #[test]
    fn copy_empty_is_an_error() {
        let mut out = Vec::new();
        assert!(matches!(
            copy_to_clipboard(&mut out, ""),
            Err(ClipboardError::Empty)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn copy_surfaces_write_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        assert!(matches!(
            copy_to_clipboard(&mut Broken, "x"),
            Err(ClipboardError::Io(_))
        ));
    }

    #[test]
    fn save_writes_verbatim_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let text = "--- Page 1 ---\n\nhello";

        let path = save_text(dir.path(), date, text).unwrap();
        assert_eq!(path, dir.path().join("extracted-text-2025-12-31.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(matches!(
            save_text(&missing, date, "x"),
            Err(SaveError::MissingDir(_))
        ));
    }
}
