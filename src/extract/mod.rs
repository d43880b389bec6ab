//! Plain-text extraction from uploaded documents.
//!
//! Extraction never fails: when a format-specific extractor cannot read the
//! bytes, the raw bytes are decoded as lossy UTF-8 instead.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

/// Extensions accepted by the analysis pipeline (lowercase, no dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:p(?:\s[^>]*?)?(?:/>|>(.*?)</w:p>)").unwrap());

static RUN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>").unwrap());

/// Lowercased extension of `filename`, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `filename` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extract readable text from `bytes`, choosing the strategy from the
/// extension of `filename`.
pub fn extract_text(bytes: &[u8], filename: &str) -> String {
    let ext = file_extension(filename);
    let extracted = match ext.as_deref() {
        Some("pdf") => extract_pdf(bytes),
        Some("docx") | Some("doc") => extract_docx(bytes),
        _ => None,
    };

    match extracted {
        Some(text) => text,
        None => {
            if matches!(ext.as_deref(), Some("pdf" | "docx" | "doc")) {
                warn!("Could not parse {}, falling back to raw text", filename);
            }
            decode_lossy(bytes)
        }
    }
}

fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Page-by-page PDF text, joined with newlines.
fn extract_pdf(bytes: &[u8]) -> Option<String> {
    // lopdf can panic on malformed content streams
    let result = std::panic::catch_unwind(|| {
        let doc = lopdf::Document::load_mem(bytes).ok()?;
        let pages: Vec<String> = doc
            .get_pages()
            .keys()
            .map(|&page| {
                // lopdf ends every page with a line break of its own
                let text = doc.extract_text(&[page]).unwrap_or_default();
                text.trim_end_matches(['\r', '\n']).to_string()
            })
            .collect();
        Some(pages.join("\n"))
    });

    match result {
        Ok(text) => text,
        Err(_) => {
            debug!("PDF parser panicked");
            None
        }
    }
}

/// Text of an OOXML word-processing document, one line per paragraph.
fn extract_docx(bytes: &[u8]) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).ok()?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .ok()?
        .read_to_string(&mut xml)
        .ok()?;

    let paragraphs: Vec<String> = PARAGRAPH_RE
        .captures_iter(&xml)
        .map(|para| {
            let inner = para.get(1).map(|m| m.as_str()).unwrap_or("");
            RUN_TEXT_RE
                .captures_iter(inner)
                .map(|run| unescape_xml(&run[1]))
                .collect::<String>()
        })
        .collect();

    Some(paragraphs.join("\n"))
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(
                "word/document.xml",
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("dir.d/README"), None);
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".bashrc"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("cv.pdf"));
        assert!(is_supported("Contract.DOCX"));
        assert!(is_supported("legacy.doc"));
        assert!(is_supported("notes.txt"));
        assert!(!is_supported("image.png"));
        assert!(!is_supported("noext"));
    }

    #[test]
    fn test_txt_is_decoded() {
        assert_eq!(extract_text(b"hello world", "notes.txt"), "hello world");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let text = extract_text(&[b'o', b'k', 0xff], "notes.txt");
        assert!(text.starts_with("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

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

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
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
    fn test_pdf_pages_joined_by_newline() {
        let bytes = build_pdf(&["Page one", "Page two"]);
        assert_eq!(extract_text(&bytes, "two.PDF"), "Page one\nPage two");
    }

    #[test]
    fn test_malformed_pdf_falls_back() {
        let text = extract_text(b"not really a pdf", "broken.pdf");
        assert_eq!(text, "not really a pdf");
    }

    #[test]
    fn test_malformed_docx_falls_back() {
        assert_eq!(extract_text(b"plain bytes", "broken.docx"), "plain bytes");
        assert_eq!(extract_text(b"plain bytes", "broken.doc"), "plain bytes");
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
<w:p w:rsidR="00A1"><w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>
<w:p/>
<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Fin</w:t></w:r></w:p>
</w:body>
</w:document>"#;
        let bytes = build_docx(xml);
        assert_eq!(
            extract_text(&bytes, "cv.docx"),
            "Jane Doe\nRust & Go\n\nFin"
        );
    }

    #[test]
    fn test_docx_without_document_xml_falls_back() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"x").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let text = extract_text(&bytes, "odd.docx");
        assert_eq!(text, String::from_utf8_lossy(&bytes));
    }

    #[test]
    fn test_unescape_xml() {
        assert_eq!(unescape_xml("a &lt;b&gt; &amp;amp;"), "a <b> &amp;");
    }
}
