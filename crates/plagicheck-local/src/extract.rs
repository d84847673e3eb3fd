//! Plain-text extraction from uploaded documents.
//!
//! Supported: `.txt` (UTF-8 with a windows-1251 fallback), `.pdf` (text
//! layer only; scanned PDFs come back empty), `.docx` (paragraph text).
//! Anything else, and any unreadable input, yields an empty string — the
//! pipeline treats "no text" as a validation failure, not an error here.

use std::io::Read;

/// Zip-bomb protection: cap on a single decompressed OOXML entry.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extract plain text from `raw` based on the filename extension.
pub fn extract_text_any(raw: &[u8], filename: &str) -> String {
    let name = filename.to_ascii_lowercase();
    if name.ends_with(".txt") {
        decode_txt(raw).trim().to_string()
    } else if name.ends_with(".pdf") {
        extract_pdf(raw).trim().to_string()
    } else if name.ends_with(".docx") {
        extract_docx(raw).trim().to_string()
    } else {
        String::new()
    }
}

/// UTF-8 first; legacy Cyrillic uploads are common enough that the fallback
/// is windows-1251 rather than latin-1.
fn decode_txt(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1251.decode(raw);
            text.into_owned()
        }
    }
}

fn extract_pdf(raw: &[u8]) -> String {
    pdf_extract::extract_text_from_mem(raw).unwrap_or_default()
}

fn extract_docx(raw: &[u8]) -> String {
    let cursor = std::io::Cursor::new(raw);
    let mut archive = match zip::ZipArchive::new(cursor) {
        Ok(a) => a,
        Err(_) => return String::new(),
    };
    let mut xml = Vec::new();
    {
        let entry = match archive.by_name("word/document.xml") {
            Ok(e) => e,
            Err(_) => return String::new(),
        };
        if entry
            .take(MAX_XML_ENTRY_BYTES)
            .read_to_end(&mut xml)
            .is_err()
        {
            return String::new();
        }
    }
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return String::new();
    }
    docx_paragraph_text(&xml)
}

/// Pull the text runs (`w:t`) out of a WordprocessingML body, one line per
/// paragraph (`w:p`). Tables and headers are out of scope, matching the
/// first-pass extractor this replaces.
fn docx_paragraph_text(xml: &[u8]) -> String {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    let line = current.trim().to_string();
                    if !line.is_empty() {
                        paragraphs.push(line);
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                if let Ok(s) = t.unescape() {
                    current.push_str(&s);
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    let tail = current.trim();
    if !tail.is_empty() {
        paragraphs.push(tail.to_string());
    }
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut w = zip::ZipWriter::new(&mut cursor);
            let opts = zip::write::SimpleFileOptions::default();
            w.start_file("word/document.xml", opts).unwrap();
            w.write_all(document_xml.as_bytes()).unwrap();
            w.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn txt_utf8_roundtrips() {
        assert_eq!(
            extract_text_any("  hello world \n".as_bytes(), "a.txt"),
            "hello world"
        );
    }

    #[test]
    fn txt_cp1251_is_decoded() {
        // "Привет" in windows-1251.
        let raw: &[u8] = &[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert_eq!(extract_text_any(raw, "b.TXT"), "Привет");
    }

    #[test]
    fn docx_paragraphs_are_joined_with_newlines() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>First para.</w:t></w:r></w:p>
                <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>para.</w:t></w:r></w:p>
                <w:p/>
              </w:body>
            </w:document>"#;
        let got = extract_text_any(&docx_bytes(xml), "essay.docx");
        assert_eq!(got, "First para.\nSecond para.");
    }

    #[test]
    fn corrupt_docx_yields_empty() {
        assert_eq!(extract_text_any(b"not a zip at all", "x.docx"), "");
    }

    #[test]
    fn unsupported_extension_yields_empty() {
        assert_eq!(extract_text_any(b"whatever", "x.doc"), "");
        assert_eq!(extract_text_any(b"whatever", "noext"), "");
    }

    #[test]
    fn corrupt_pdf_yields_empty() {
        assert_eq!(extract_text_any(b"%PDF-garbage", "x.pdf"), "");
    }
}
