use std::io::Write;
use std::path::Path;

use cipherdocs_core::{NO_TEXT_SENTINEL, PAGE_ERROR_MARKER};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Page blocks and failed pages found in finished extraction output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub pages_with_text: usize,
    pub failed_pages: usize,
}

/// Page number of a `--- Page N ---` header line.
fn page_header(chunk: &str) -> Option<usize> {
    chunk
        .strip_prefix("--- Page ")?
        .strip_suffix(" ---")?
        .parse()
        .ok()
}

/// Walk the `header \n\n body \n\n header ...` layout of the output.
///
/// A header only counts where a header is expected and when its page number
/// is above the previous one, so page text that happens to look like a
/// header is treated as text.
pub fn text_stats(text: &str) -> TextStats {
    let mut stats = TextStats::default();
    let mut last_page = 0;
    let mut expect_header = true;

    for chunk in text.split("\n\n") {
        if expect_header
            && let Some(page) = page_header(chunk)
            && page > last_page
        {
            last_page = page;
            stats.pages_with_text += 1;
            expect_header = false;
            continue;
        }
        if !expect_header && chunk == PAGE_ERROR_MARKER {
            stats.pages_with_text -= 1;
            stats.failed_pages += 1;
        }
        expect_header = true;
    }
    stats
}

/// Print a one-line summary of what was extracted.
pub fn print_summary(
    w: &mut dyn Write,
    file_name: &str,
    text: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if text == NO_TEXT_SENTINEL {
        if color.enabled() {
            writeln!(w, "{} {}", file_name.bold(), NO_TEXT_SENTINEL.yellow())?;
        } else {
            writeln!(w, "{} {}", file_name, NO_TEXT_SENTINEL)?;
        }
        return Ok(());
    }

    let stats = text_stats(text);
    let headline = format!(
        "{} page{} with text",
        stats.pages_with_text,
        if stats.pages_with_text == 1 { "" } else { "s" }
    );

    if color.enabled() {
        write!(w, "{} {}", file_name.bold(), headline.green())?;
        if stats.failed_pages > 0 {
            write!(
                w,
                ", {}",
                format!("{} failed", stats.failed_pages).red().bold()
            )?;
        }
    } else {
        write!(w, "{} {}", file_name, headline)?;
        if stats.failed_pages > 0 {
            write!(w, ", {} failed", stats.failed_pages)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Report where a download was written.
pub fn print_saved(w: &mut dyn Write, path: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Saved to".dimmed(), path.display().cyan())
    } else {
        writeln!(w, "Saved to {}", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_blocks_and_failures() {
        let text = "--- Page 1 ---\n\nhello\n\n--- Page 2 ---\n\n[Error extracting text from this page]\n\n--- Page 4 ---\n\nbye";
        assert_eq!(
            text_stats(text),
            TextStats {
                pages_with_text: 2,
                failed_pages: 1
            }
        );
    }

    #[test]
    fn header_lookalikes_in_page_text_are_not_counted() {
        let text = "--- Page 1 ---\n\n--- Page 7 --- is quoted here\n\n--- Page 2 ---\n\n--- Page 1 ---\n\n--- Page 3 ---\n\n[Error extracting text from this page]";
        assert_eq!(
            text_stats(text),
            TextStats {
                pages_with_text: 2,
                failed_pages: 1
            }
        );
    }

    #[test]
    fn error_marker_inside_text_is_not_a_failure() {
        let text = "--- Page 1 ---\n\nsee [Error extracting text from this page] above";
        assert_eq!(
            text_stats(text),
            TextStats {
                pages_with_text: 1,
                failed_pages: 0
            }
        );
    }

    #[test]
    fn summary_without_color() {
        let mut out = Vec::new();
        print_summary(
            &mut out,
            "a.pdf",
            "--- Page 1 ---\n\nhello",
            ColorMode(false),
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a.pdf 1 page with text\n");
    }

    #[test]
    fn summary_for_sentinel() {
        let mut out = Vec::new();
        print_summary(&mut out, "scan.pdf", NO_TEXT_SENTINEL, ColorMode(false)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("scan.pdf {NO_TEXT_SENTINEL}\n")
        );
    }
}
