// File upload agent
// Turns an uploaded PDF or spreadsheet into the plain text used as document context

use crate::models::DocumentContext;
use crate::types::{AppError, AppResult, DocumentKind};
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::{info, warn};

pub struct FileUploadAgent;

impl FileUploadAgent {
    pub fn process_file(filename: &str, content: &[u8]) -> AppResult<DocumentContext> {
        let kind = DocumentKind::from_filename(filename).ok_or_else(|| {
            AppError::UnsupportedFile(format!(
                "'{}' is not a PDF or spreadsheet (expected .pdf, .xlsx, .xls, .xlsm, .xlsb or .ods)",
                filename
            ))
        })?;

        info!(filename, kind = %kind, size = content.len(), "Extracting document text");

        let text = match kind {
            DocumentKind::Pdf => Self::extract_pdf_text(content)?,
            DocumentKind::Spreadsheet => Self::extract_spreadsheet_text(content)?,
        };

        if text.trim().is_empty() {
            warn!(filename, "Document produced no text; questions will be sent without context");
        } else {
            info!(filename, text_len = text.len(), "Document text extracted");
        }

        Ok(DocumentContext::new(filename, kind, text))
    }

    /// Read a file from disk and extract it
    pub async fn process_path(path: &Path) -> AppResult<DocumentContext> {
        let content = tokio::fs::read(path).await.map_err(|e| {
            AppError::InvalidRequest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        Self::process_file(filename, &content)
    }

    /// Concatenate the text of every page in page order
    fn extract_pdf_text(content: &[u8]) -> AppResult<String> {
        let doc = lopdf::Document::load_mem(content)
            .map_err(|e| AppError::Extraction(format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages();
        let mut text = String::new();

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    if !page_text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                Err(e) => {
                    warn!(page = page_number, error = %e, "Could not extract text from page");
                }
            }
        }

        Ok(text)
    }

    fn extract_spreadsheet_text(content: &[u8]) -> AppResult<String> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))
            .map_err(|e| AppError::Extraction(format!("Failed to open spreadsheet: {}", e)))?;

        let mut text = String::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            match workbook.worksheet_range(&sheet_name) {
                Ok(range) => text.push_str(&render_sheet(&sheet_name, &range)),
                Err(e) => {
                    warn!(sheet = %sheet_name, error = %e, "Could not read worksheet");
                }
            }
        }

        Ok(text)
    }
}

/// Render a sheet as a `Sheet: <name>` header followed by ` | `-separated rows
fn render_sheet(name: &str, range: &Range<Data>) -> String {
    let mut rendered = format!("Sheet: {}\n", name);

    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        // Skip empty rows
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rendered.push_str(&cells.join(" | "));
        rendered.push('\n');
    }

    rendered.push('\n');
    rendered
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_excel_datetime(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

/// Calendar timestamps for date cells, durations for time-delta cells, else the raw serial
fn render_excel_datetime(dt: &ExcelDateTime) -> String {
    let rendered = if dt.is_duration() {
        dt.as_duration().map(|duration| duration.to_string())
    } else {
        dt.as_datetime().map(|datetime| datetime.to_string())
    };
    rendered.unwrap_or_else(|| dt.as_f64().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry, each page showing its text
    pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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
    fn test_pdf_pages_extracted_in_order() {
        let pdf = sample_pdf(&["Quarterly revenue 42", "Operating margin 7"]);

        let document = FileUploadAgent::process_file("report.pdf", &pdf).unwrap();

        assert_eq!(document.kind, DocumentKind::Pdf);
        assert_eq!(document.filename, "report.pdf");
        let revenue = document.text.find("Quarterly revenue 42").expect("page 1 text");
        let margin = document.text.find("Operating margin 7").expect("page 2 text");
        assert!(revenue < margin);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = FileUploadAgent::process_file("notes.txt", b"hello").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFile(_)));
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let err = FileUploadAgent::process_file("broken.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_corrupt_spreadsheet_is_extraction_error() {
        let err = FileUploadAgent::process_file("broken.xlsx", b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_render_sheet_skips_empty_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("Item".to_string()));
        range.set_value((0, 1), Data::String("Amount".to_string()));
        range.set_value((0, 2), Data::String("Paid".to_string()));
        range.set_value((2, 0), Data::String("Rent".to_string()));
        range.set_value((2, 1), Data::Float(1200.5));
        range.set_value((2, 2), Data::Bool(true));

        let rendered = render_sheet("Expenses", &range);

        assert_eq!(rendered, "Sheet: Expenses\nItem | Amount | Paid\nRent | 1200.5 | true\n\n");
    }

    #[test]
    fn test_render_sheet_shows_calendar_dates() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Date".to_string()));
        range.set_value((0, 1), Data::String("Balance".to_string()));
        range.set_value(
            (1, 0),
            Data::DateTime(ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false)),
        );
        range.set_value((1, 1), Data::Int(900));

        let rendered = render_sheet("Ledger", &range);

        assert_eq!(rendered, "Sheet: Ledger\nDate | Balance\n2024-01-01 00:00:00 | 900\n\n");
        assert!(!rendered.contains("45292"));
    }

    #[tokio::test]
    async fn test_process_path_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.pdf");
        std::fs::write(&path, sample_pdf(&["Cash on hand 900"])).unwrap();

        let document = FileUploadAgent::process_path(&path).await.unwrap();

        assert_eq!(document.filename, "statement.pdf");
        assert!(document.text.contains("Cash on hand 900"));
    }

    #[tokio::test]
    async fn test_process_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileUploadAgent::process_path(&dir.path().join("missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }
}
