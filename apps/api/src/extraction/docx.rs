//! DOCX paragraph reader: unzips `word/document.xml` and walks body paragraphs.

use std::io::{Cursor, Read};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Returns the text of every body paragraph in document order.
/// Empty paragraphs are kept as empty strings.
pub fn extract_paragraphs(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    parse_document_xml(&xml)
}

/// Paragraphs inside tables and text boxes are not body paragraphs and are skipped.
fn parse_document_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut nested_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Docx(e.to_string()))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => nested_depth += 1,
                b"w:p" if nested_depth == 0 => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if nested_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if nested_depth == 0 => push_text(&mut current, "\t"),
                b"w:br" | b"w:cr" if nested_depth == 0 => push_text(&mut current, "\n"),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => nested_depth = nested_depth.saturating_sub(1),
                b"w:p" if nested_depth == 0 => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text && nested_depth == 0 => {
                let text = t.decode().map_err(|e| ExtractError::Docx(e.to_string()))?;
                push_text(&mut current, &text);
            }
            Event::GeneralRef(r) if in_text && nested_depth == 0 => {
                let resolved = match r
                    .resolve_char_ref()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?
                {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = r.decode().map_err(|e| ExtractError::Docx(e.to_string()))?;
                        resolve_predefined_entity(&name)
                            .unwrap_or_default()
                            .to_string()
                    }
                };
                push_text(&mut current, &resolved);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_text(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}
