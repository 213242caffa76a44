use crate::error::{AppError, Result};
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const UNSUPPORTED_PREVIEW: &str = "❌ Unsupported file format for preview.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Text(String),
    /// The declared name has no recognized suffix. Not an error.
    Unsupported,
}

impl Preview {
    pub fn into_text(self) -> String {
        match self {
            Preview::Text(text) => text,
            Preview::Unsupported => UNSUPPORTED_PREVIEW.to_string(),
        }
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Text(text) => f.write_str(text),
            Preview::Unsupported => f.write_str(UNSUPPORTED_PREVIEW),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    PlainText,
    Pdf,
}

impl PreviewKind {
    /// Case-sensitive suffix match on the declared name.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".txt") {
            Some(PreviewKind::PlainText)
        } else if name.ends_with(".pdf") {
            Some(PreviewKind::Pdf)
        } else {
            None
        }
    }
}

pub fn render_preview(local_path: &Path, declared_name: &str) -> Result<Preview> {
    match PreviewKind::from_name(declared_name) {
        Some(PreviewKind::PlainText) => Ok(Preview::Text(std::fs::read_to_string(local_path)?)),
        Some(PreviewKind::Pdf) => extract_pdf_text(local_path).map(Preview::Text),
        None => Ok(Preview::Unsupported),
    }
}

fn extract_pdf_text(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path)
        .map_err(|e| AppError::Parse(format!("Failed to open PDF: {e}")))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_number]).map(page_text) {
            Ok(Some(text)) => pages.push(text),
            Ok(None) => debug!("Page {} has no extractable text", page_number),
            Err(e) => debug!("Failed to extract text from page {}: {}", page_number, e),
        }
    }

    Ok(pages.join("\n"))
}

/// Drops the single line ending lopdf appends after the last text object.
fn page_text(mut text: String) -> Option<String> {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    (!text.is_empty()).then_some(text)
}
