// src/report.rs
// Renders analysis text into a paginated PDF report.

use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

use crate::error::{Result, VakilError};

pub const REPORT_TITLE: &str = "AI Legal Assistant - Report";
pub const REPORT_FILE_NAME: &str = "legal_analysis.pdf";

// US Letter, in points.
const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;
const MARGIN_PT: f32 = 50.0;
const LINE_STEP_PT: f32 = 15.0;
const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const MAX_LINE_CHARS: usize = 1000;

/// Renders the report as PDF bytes. The first page carries a bold
/// title; body lines flow down the page at a fixed leading and spill
/// onto continuation pages when they run past the bottom margin.
pub fn render_report(text: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm::from(Pt(PAGE_WIDTH_PT)),
        Mm::from(Pt(PAGE_HEIGHT_PT)),
        "Layer 1",
    );

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| VakilError::RenderError(e.to_string()))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| VakilError::RenderError(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    layer.use_text(
        REPORT_TITLE,
        TITLE_SIZE,
        Mm::from(Pt(MARGIN_PT)),
        Mm::from(Pt(PAGE_HEIGHT_PT - 50.0)),
        &bold,
    );

    let mut y = PAGE_HEIGHT_PT - 80.0;
    for line in text.split('\n') {
        if y < MARGIN_PT {
            let (page, page_layer) = doc.add_page(
                Mm::from(Pt(PAGE_WIDTH_PT)),
                Mm::from(Pt(PAGE_HEIGHT_PT)),
                "Layer 1",
            );
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_PT - 50.0;
        }
        let capped: String = line.chars().take(MAX_LINE_CHARS).collect();
        layer.use_text(
            capped,
            BODY_SIZE,
            Mm::from(Pt(MARGIN_PT)),
            Mm::from(Pt(y)),
            &regular,
        );
        y -= LINE_STEP_PT;
    }

    doc.save_to_bytes()
        .map_err(|e| VakilError::RenderError(e.to_string()))
}

/// Renders the report and writes it to `path`.
pub fn save_report(text: &str, path: &Path) -> Result<()> {
    let bytes = render_report(text)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_bytes_are_a_pdf() {
        let bytes = render_report("The summons requires appearance on June 2.").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn short_report_stays_on_one_page() {
        let bytes = render_report("line one\nline two").unwrap();
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains(REPORT_TITLE));
        assert!(pages[0].contains("line one"));
        assert!(pages[0].contains("line two"));
    }

    #[test]
    fn long_report_flows_onto_a_second_page() {
        let body = (1..=60)
            .map(|i| format!("finding {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = render_report(&body).unwrap();
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("finding 1"));
        assert!(pages[1].contains("finding 60"));
    }

    #[test]
    fn save_report_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        save_report("saved analysis", &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
