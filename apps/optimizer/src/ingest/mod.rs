// Resume file ingestion: uploaded PDF / DOCX / TXT → plain text.
// PDF extraction is CPU-bound and runs on tokio::task::spawn_blocking.

pub mod docx;
pub mod handlers;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub const UNSUPPORTED_FILE_MESSAGE: &str =
    "Unsupported file type. Please upload a PDF, DOCX, or TXT file.";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{}", UNSUPPORTED_FILE_MESSAGE)]
    Unsupported,

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not open DOCX package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Could not parse DOCX content: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error while reading upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Txt,
}

impl FileKind {
    /// Dispatch on the (case-insensitive) extension after the last dot.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or(ExtractError::Unsupported)?;
        match extension.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "docx" => Ok(FileKind::Docx),
            "txt" => Ok(FileKind::Txt),
            _ => Err(ExtractError::Unsupported),
        }
    }
}

/// Extracts the plain text of an uploaded resume.
pub async fn parse_resume_file(file_name: &str, bytes: Bytes) -> Result<String, ExtractError> {
    let kind = FileKind::from_file_name(file_name)?;
    debug!(?kind, size = bytes.len(), "extracting resume text");

    match kind {
        FileKind::Txt => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        FileKind::Docx => docx::extract_docx_text(&bytes),
        FileKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| ExtractError::Pdf(format!("extraction task failed: {e}")))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension_is_case_insensitive() {
        assert_eq!(FileKind::from_file_name("cv.PDF").unwrap(), FileKind::Pdf);
        assert_eq!(FileKind::from_file_name("my.resume.Docx").unwrap(), FileKind::Docx);
        assert_eq!(FileKind::from_file_name("notes.txt").unwrap(), FileKind::Txt);
    }

    #[test]
    fn test_unsupported_extensions_are_rejected() {
        for name in ["resume.doc", "resume", "image.png", "archive.tar.gz"] {
            let err = FileKind::from_file_name(name).unwrap_err();
            assert_eq!(err.to_string(), UNSUPPORTED_FILE_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_txt_is_decoded_lossily() {
        let bytes = Bytes::from_static(b"Jane Doe\nEngineer \xff");
        let text = parse_resume_file("cv.txt", bytes).await.unwrap();
        assert!(text.starts_with("Jane Doe\nEngineer "));
        assert!(text.ends_with('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_docx_dispatch() {
        let bytes = docx::tests::make_docx("<w:p><w:r><w:t>Hello</w:t></w:r></w:p>");
        let text = parse_resume_file("CV.DOCX", Bytes::from(bytes)).await.unwrap();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error() {
        let result = parse_resume_file("cv.pdf", Bytes::from_static(b"not a pdf")).await;
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }
}
