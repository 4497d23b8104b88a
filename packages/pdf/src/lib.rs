#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF text extraction for the kvsheet pipeline.
//!
//! Uses pure-Rust text extraction ([`pdf_extract`]) page by page and joins
//! the pages in document order. Each page with text contributes a `"\n"`
//! followed by its text; pages without extractable text (blank or
//! image-only) contribute nothing. An image-only document therefore yields
//! an empty string rather than an error.

use std::path::Path;

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed (malformed or unsupported document).
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// Reading the PDF file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text extracted from a whole PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Page texts joined in document order (see [`join_pages`]).
    pub text: String,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Number of pages that yielded no text.
    pub blank_pages: usize,
}

/// Reads a PDF file and extracts its text.
///
/// The file is read fully into memory and closed before extraction starts.
///
/// # Errors
///
/// * [`PdfError::Io`] if the file cannot be read
/// * [`PdfError::Extraction`] if the file is not a readable PDF
pub fn extract_text_from_path(path: impl AsRef<Path>) -> Result<ExtractedText, PdfError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    extract_text_from_mem(&bytes)
}

/// Extracts text from an in-memory PDF.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if `bytes` is not a readable PDF.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<ExtractedText, PdfError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    let page_count = pages.len();
    let blank_pages = pages.iter().filter(|p| is_blank(p)).count();
    let text = join_pages(&pages);

    log::debug!(
        "Extracted {} characters from {page_count} page(s) ({blank_pages} without text)",
        text.chars().count()
    );

    Ok(ExtractedText {
        text,
        page_count,
        blank_pages,
    })
}

/// Joins per-page texts in order, prefixing each non-blank page with
/// `"\n"`.
///
/// A page whose text is empty or whitespace-only contributes nothing, not
/// even a newline.
#[must_use]
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        let page = page.as_ref();
        if is_blank(page) {
            continue;
        }
        text.push('\n');
        text.push_str(page);
    }
    text
}

fn is_blank(page: &str) -> bool {
    page.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    use super::*;

    /// Builds a PDF with one page per entry; an empty entry is a page with
    /// no text.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let operations = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ]
                };
                let content = Content { operations }.encode().unwrap();
                let content_id = doc.add_object(Stream::new(dictionary! {}, content));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        let count = i64::try_from(kids.len()).unwrap();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn joins_pages_with_newline_prefixes() {
        let text = join_pages(&["Name: Alice", "Age: 30"]);
        assert_eq!(text, "\nName: Alice\nAge: 30");
    }

    #[test]
    fn blank_pages_contribute_nothing() {
        let text = join_pages(&["Name: Alice", "", "  \n ", "Age: 30"]);
        assert_eq!(text, "\nName: Alice\nAge: 30");
    }

    #[test]
    fn all_blank_pages_yield_empty_text() {
        let pages: [&str; 2] = ["", "\n\n"];
        assert_eq!(join_pages(&pages), "");
        assert_eq!(join_pages::<&str>(&[]), "");
    }

    #[test]
    fn extracts_pages_in_order_and_counts_blank_ones() {
        let bytes = pdf_with_pages(&["Name: Alice", "", "Age: 30"]);

        let extracted = extract_text_from_mem(&bytes).unwrap();

        assert_eq!(extracted.page_count, 3);
        assert_eq!(extracted.blank_pages, 1);
        assert!(extracted.text.starts_with('\n'));
        assert_eq!(
            extracted.text.split_whitespace().collect::<Vec<_>>(),
            ["Name:", "Alice", "Age:", "30"]
        );
    }

    #[test]
    fn reads_pdf_from_path() {
        let path = std::env::temp_dir().join("kvsheet_pdf_test_one_page.pdf");
        std::fs::write(&path, pdf_with_pages(&["Hello"])).unwrap();

        let extracted = extract_text_from_path(&path).unwrap();
        assert_eq!(extracted.page_count, 1);
        assert_eq!(extracted.blank_pages, 0);
        assert_eq!(extracted.text.trim(), "Hello");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_pdf_is_an_extraction_error() {
        let result = extract_text_from_mem(b"this is not a pdf");
        assert!(matches!(result, Err(PdfError::Extraction(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("kvsheet_pdf_test_missing.pdf");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            extract_text_from_path(&path),
            Err(PdfError::Io(_))
        ));
    }
}
