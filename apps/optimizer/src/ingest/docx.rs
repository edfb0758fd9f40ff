//! Plain-text extraction from `.docx` packages.
//!
//! Reads `word/document.xml` out of the zip container and walks the
//! WordprocessingML tree: each `w:p` becomes one line, `w:t` contributes its
//! text, `w:tab` a tab and `w:br`/`w:cr` a line break.

use std::io::{Cursor, Read};

use crate::ingest::ExtractError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let doc = roxmltree::Document::parse(&xml)?;
    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|node| is_word(node, "p"))
        .map(paragraph_text)
        .collect();

    Ok(paragraphs.join("\n"))
}

fn is_word(node: &roxmltree::Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WORD_NS)
}

fn paragraph_text(paragraph: roxmltree::Node<'_, '_>) -> String {
    let mut text = String::new();
    for node in paragraph.descendants().filter(|n| n.is_element()) {
        if node.tag_name().namespace() != Some(WORD_NS) {
            continue;
        }
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::FileOptions;

    use super::*;

    /// Builds a minimal .docx in memory with the given `w:body` inner XML.
    pub(crate) fn make_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WORD_NS}"><w:body>{body}</w:body></w:document>"#
        );
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            writer.start_file(DOCUMENT_PART, FileOptions::default()).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let bytes = make_docx(
            "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">Senior </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>",
        );
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Jane Doe\nSenior Engineer");
    }

    #[test]
    fn test_tabs_and_breaks_are_preserved() {
        let bytes = make_docx("<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>");
        assert_eq!(extract_docx_text(&bytes).unwrap(), "A\tB\nC");
    }

    #[test]
    fn test_empty_paragraph_is_blank_line() {
        let bytes = make_docx("<w:p><w:r><w:t>One</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Three</w:t></w:r></w:p>");
        assert_eq!(extract_docx_text(&bytes).unwrap(), "One\n\nThree");
    }

    #[test]
    fn test_missing_document_part_is_an_error() {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            writer.start_file("other.xml", FileOptions::default()).unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        assert!(matches!(extract_docx_text(&buf), Err(ExtractError::Zip(_))));
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        assert!(extract_docx_text(b"plain text").is_err());
    }
}
