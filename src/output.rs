//! CLI output formatting.
//!
//! Every entity is printed as a header line (positional index + file name)
//! followed by indented context lines:
//!
//! ```text
//! 001 dawn.jpg
//!     Source: photos/dawn.jpg
//! 002 dusk.png (1600x1200, image/png, 2.4 MB data URL)
//! 003 broken.png
//!     Error: failed to decode image: ...
//! ```
//!
//! Dimensions are printed `WIDTHxHEIGHT`, the usual order for people, even
//! though the library's types list height first.
//!
//! Each `format_*` function is pure and returns `Vec<String>` for testability;
//! [`print_lines`] writes them to stdout.

use crate::imaging::{FileHandle, FsFile};
use crate::types::{BlobDetails, Dimensions, ScaleResult};
use std::fmt::Display;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

pub fn format_dimensions(dims: Dimensions) -> String {
    format!("{}x{}", dims.width, dims.height)
}

/// Human-readable byte count (B, KB, MB; powers of 1024).
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

pub fn format_file_list(files: &[FsFile]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, file) in files.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file.name()));
        lines.push(format!("{}Source: {}", indent(1), file.path().display()));
    }
    if files.is_empty() {
        lines.push("No files".to_string());
    }
    lines
}

pub fn format_blob(index: usize, blob: &BlobDetails) -> Vec<String> {
    let mime = blob.base64.mime_type().unwrap_or("unknown");
    vec![format!(
        "{} {} ({}, {}, {} data URL)",
        format_index(index),
        blob.name,
        format_dimensions(blob.dimensions),
        mime,
        format_size(blob.base64.as_str().len())
    )]
}

pub fn format_failure(index: usize, name: &str, error: &dyn Display) -> Vec<String> {
    vec![
        format!("{} {}", format_index(index), name),
        format!("{}Error: {}", indent(1), error),
    ]
}

/// Summary of a scale call: what came in, what went out, and where it went.
pub fn format_scale(
    name: &str,
    natural: Dimensions,
    result: &ScaleResult,
    destination: &str,
) -> Vec<String> {
    let outcome = if result.dimensions == natural {
        "unchanged"
    } else {
        "re-encoded"
    };
    vec![
        name.to_string(),
        format!("{}Natural: {}", indent(1), format_dimensions(natural)),
        format!(
            "{}Scaled: {} ({})",
            indent(1),
            format_dimensions(result.dimensions),
            outcome
        ),
        format!(
            "{}Output: {} ({})",
            indent(1),
            destination,
            format_size(result.base64.as_str().len())
        ),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_url::EncodedImage;

    #[test]
    fn index_is_zero_padded() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn dimensions_print_width_first() {
        assert_eq!(format_dimensions(Dimensions::new(200, 100)), "100x200");
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }

    #[test]
    fn file_list_shows_name_and_source() {
        let files = vec![FsFile::new("photos/dawn.jpg"), FsFile::new("dusk.png")];
        assert_eq!(
            format_file_list(&files),
            vec![
                "001 dawn.jpg",
                "    Source: photos/dawn.jpg",
                "002 dusk.png",
                "    Source: dusk.png",
            ]
        );
    }

    #[test]
    fn empty_file_list() {
        assert_eq!(format_file_list(&[]), vec!["No files"]);
    }

    #[test]
    fn blob_line_summarizes_conversion() {
        let blob = BlobDetails {
            base64: EncodedImage::new("data:image/png;base64,AAAA"),
            dimensions: Dimensions::new(200, 100),
            name: "a.png".to_string(),
        };
        assert_eq!(
            format_blob(3, &blob),
            vec!["003 a.png (100x200, image/png, 26 B data URL)"]
        );
    }

    #[test]
    fn failure_is_indented_under_name() {
        let lines = format_failure(2, "broken.png", &"bad bytes");
        assert_eq!(lines, vec!["002 broken.png", "    Error: bad bytes"]);
    }

    #[test]
    fn scale_summary_marks_outcome() {
        let natural = Dimensions::new(200, 100);
        let scaled = ScaleResult {
            base64: EncodedImage::new("data:image/png;base64,AAAA"),
            dimensions: Dimensions::new(50, 25),
        };
        let lines = format_scale("a.png", natural, &scaled, "stdout");
        assert_eq!(lines[1], "    Natural: 100x200");
        assert_eq!(lines[2], "    Scaled: 25x50 (re-encoded)");
        assert_eq!(lines[3], "    Output: stdout (26 B)");

        let kept = ScaleResult {
            dimensions: natural,
            ..scaled
        };
        let lines = format_scale("a.png", natural, &kept, "stdout");
        assert_eq!(lines[2], "    Scaled: 100x200 (unchanged)");
    }
}
