// src/extract.rs
// PDF text extraction with an OCR fallback for scanned documents.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, VakilError};

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<OcrParsedResult>,
}

#[derive(Debug, Deserialize)]
struct OcrParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

/// Client for the OCR.space parse endpoint.
#[derive(Debug, Clone)]
pub struct OcrClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OcrClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_OCR_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint,
        }
    }

    /// Sends the PDF bytes for recognition and concatenates the parsed
    /// text of every result, one newline after each.
    pub async fn recognize(&self, bytes: &[u8]) -> Result<String> {
        let file = Part::bytes(bytes.to_vec())
            .file_name("document.pdf")
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("file", file)
            .text("apikey", self.api_key.clone())
            .text("OCREngine", "2")
            .text("language", "eng");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<OcrResponse>()
            .await?;

        let mut text = String::new();
        for result in response.parsed_results {
            text.push_str(&result.parsed_text);
            text.push('\n');
        }
        Ok(text)
    }
}

/// Extracts text from uploaded PDFs, falling back to OCR when the
/// document has no embedded text and an OCR key is configured.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    ocr: Option<OcrClient>,
}

impl DocumentExtractor {
    pub fn new(ocr_api_key: Option<String>) -> Self {
        Self {
            ocr: ocr_api_key.map(OcrClient::new),
        }
    }

    pub fn with_ocr(ocr: Option<OcrClient>) -> Self {
        Self { ocr }
    }

    pub async fn extract_path(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        self.extract_bytes(&bytes).await
    }

    /// Page-by-page embedded text, one newline appended after each
    /// non-empty page. Scanned PDFs come back empty here; those go to
    /// OCR when a key is configured, otherwise the empty text stands.
    pub async fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| VakilError::ExtractionError(e.to_string()))?;

        let mut text = String::new();
        for page in pages {
            if !page.is_empty() {
                text.push_str(&page);
                text.push('\n');
            }
        }

        if text.trim().is_empty() {
            if let Some(ocr) = &self.ocr {
                info!("no embedded text found, falling back to OCR");
                text = ocr.recognize(bytes).await?;
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::{Mm, PdfDocument};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn blank_pdf() -> Vec<u8> {
        let (doc, _page, _layer) =
            PdfDocument::new("Scanned", Mm(215.9), Mm(279.4), "Layer 1");
        doc.save_to_bytes().unwrap()
    }

    #[tokio::test]
    async fn textless_pdf_without_ocr_key_yields_empty_text() {
        let extractor = DocumentExtractor::new(None);
        let text = extractor.extract_bytes(&blank_pdf()).await.unwrap();
        assert!(text.trim().is_empty());
    }

    #[tokio::test]
    async fn textless_pdf_falls_back_to_ocr() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse/image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ParsedResults": [
                    { "ParsedText": "SUMMONS TO APPEAR" },
                    { "ParsedText": "Section 420" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ocr = OcrClient::with_endpoint(
            "ocr-key".to_string(),
            format!("{}/parse/image", server.uri()),
        );
        let extractor = DocumentExtractor::with_ocr(Some(ocr));
        let text = extractor.extract_bytes(&blank_pdf()).await.unwrap();
        assert_eq!(text, "SUMMONS TO APPEAR\nSection 420\n");
    }

    #[tokio::test]
    async fn garbage_bytes_report_extraction_error() {
        let extractor = DocumentExtractor::new(None);
        let result = extractor.extract_bytes(b"not a pdf at all").await;
        assert!(matches!(result, Err(VakilError::ExtractionError(_))));
    }
}
