use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use super::RenderError;

/// One paragraph per input line; empty lines become empty paragraphs so
/// spacing survives the round trip into the document.
pub fn render_docx(text: &str) -> Result<Vec<u8>, RenderError> {
    let mut docx = Docx::new();

    for line in text.split('\n') {
        let content = if line.is_empty() { " " } else { line };
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(content)));
    }

    let mut buf = Vec::new();
    docx.build()
        .pack(Cursor::new(&mut buf))
        .map_err(|e| RenderError::Docx(e.to_string()))?;

    Ok(buf)
}
