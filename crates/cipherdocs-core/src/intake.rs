//! File intake: pick the first candidate, check its declared media type.
//!
//! The declared type comes from the file extension, the same way a file
//! chooser reports it. Content is never sniffed here; a mislabelled file
//! fails later with [`crate::ExtractError::Parse`].

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("not a PDF file (declared type: {declared:?})")]
    InvalidFileType { path: PathBuf, declared: String },
    #[error("no file supplied")]
    NoFile,
}

/// Media type a file chooser would declare for `path`. Empty when unknown.
pub fn declared_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "txt" | "text" => "text/plain",
        "md" => "text/markdown",
        "htm" | "html" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ps" => "application/postscript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "",
    }
}

/// Accept `path` only if its declared type is exactly [`PDF_MEDIA_TYPE`].
pub fn validate(path: &Path) -> Result<(), IntakeError> {
    let declared = declared_media_type(path);
    if declared == PDF_MEDIA_TYPE {
        Ok(())
    } else {
        Err(IntakeError::InvalidFileType {
            path: path.to_path_buf(),
            declared: declared.to_string(),
        })
    }
}

/// Take the first of several candidates and validate it. The rest are ignored.
pub fn accept_first<I>(candidates: I) -> Result<PathBuf, IntakeError>
where
    I: IntoIterator<Item = PathBuf>,
{
    let first = candidates.into_iter().next().ok_or(IntakeError::NoFile)?;
    validate(&first)?;
    Ok(first)
}

/// Split text delivered by a terminal drop (bracketed paste) into paths.
///
/// Handles quoting, backslash-escaped spaces, one path per line and
/// `file://` URLs. If the whole trimmed text names an existing file it is
/// returned as-is, so unescaped paths with spaces still work.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if Path::new(trimmed).is_file() {
        return vec![PathBuf::from(trimmed)];
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in trimmed.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(c),
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .map(|t| match t.strip_prefix("file://") {
            Some(rest) => PathBuf::from(percent_decode(rest)),
            None => PathBuf::from(t),
        })
        .collect()
}

/// Decode `%XX` escapes in a `file://` URL path. Invalid UTF-8 is replaced.
fn percent_decode(s: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(s.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert_eq!(declared_media_type(Path::new("paper.PDF")), PDF_MEDIA_TYPE);
        assert!(validate(Path::new("/tmp/a/paper.pdf")).is_ok());
    }

    #[test]
    fn non_pdf_is_rejected_with_declared_type() {
        let err = validate(Path::new("notes.txt")).unwrap_err();
        assert_eq!(
            err,
            IntakeError::InvalidFileType {
                path: PathBuf::from("notes.txt"),
                declared: "text/plain".into(),
            }
        );
    }

    #[test]
    fn missing_extension_declares_nothing() {
        assert_eq!(declared_media_type(Path::new("README")), "");
        assert!(validate(Path::new("README")).is_err());
    }

    #[test]
    fn accept_first_ignores_the_rest() {
        let got = accept_first(vec![PathBuf::from("a.pdf"), PathBuf::from("b.txt")]).unwrap();
        assert_eq!(got, PathBuf::from("a.pdf"));

        let err = accept_first(vec![PathBuf::from("b.txt"), PathBuf::from("a.pdf")]);
        assert!(matches!(err, Err(IntakeError::InvalidFileType { .. })));

        assert_eq!(accept_first(Vec::new()), Err(IntakeError::NoFile));
    }

    #[test]
    fn dropped_paths_quoted_and_escaped() {
        let paths = parse_dropped_paths("'/tmp/my file.pdf' /tmp/other\\ doc.pdf\n\"/x/y.pdf\"");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/tmp/my file.pdf"),
                PathBuf::from("/tmp/other doc.pdf"),
                PathBuf::from("/x/y.pdf"),
            ]
        );
    }

    #[test]
    fn dropped_file_url_is_decoded() {
        let paths = parse_dropped_paths("file:///home/me/My%20Paper.pdf\n");
        assert_eq!(paths, vec![PathBuf::from("/home/me/My Paper.pdf")]);
    }

    #[test]
    fn dropped_file_url_with_utf8_and_stray_percent() {
        let paths = parse_dropped_paths("file:///tmp/r%C3%A9sum%C3%A9%2.pdf");
        assert_eq!(paths, vec![PathBuf::from("/tmp/résumé%2.pdf")]);
    }

    #[test]
    fn dropped_existing_path_with_spaces_is_kept_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("with space.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let paths = parse_dropped_paths(&format!("  {}  ", path.display()));
        assert_eq!(paths, vec![path]);
    }

    #[test]
    fn empty_drop_yields_nothing() {
        assert!(parse_dropped_paths("   \n").is_empty());
    }
}
