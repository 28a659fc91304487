//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Minimal one-page PDF showing `text` in Helvetica.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    pdf_with_pages(&[text])
}

/// Minimal PDF with one page per entry of `pages`, in order.
///
/// Body first, then the xref table with real byte offsets so the
/// extractor can parse it. Object 3 is the shared font; page `i` is
/// object `4 + 2i` with its content stream in `5 + 2i`. Page texts must
/// not contain parentheses or backslashes.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >> stream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj {} endobj\n", i + 1, body).as_bytes());
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}

/// Bytes that claim to be a PDF but have no parsable structure.
pub fn broken_pdf() -> Vec<u8> {
    b"%PDF-1.4\nthis is not really a pdf\n".to_vec()
}

pub fn write_pdf(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), pdf_with_text(text)).unwrap();
}

pub fn write_multi_page_pdf(dir: &Path, name: &str, pages: &[&str]) {
    fs::write(dir.join(name), pdf_with_pages(pages)).unwrap();
}
