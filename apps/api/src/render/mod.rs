//! Report rendering: plain text to a downloadable single-byte-encoded PDF.
//!
//! The built-in Helvetica font only covers a single-byte encoding, so any
//! character above U+00FF is replaced with `?` before layout. Rendering never
//! fails because of its input text.

pub mod font_metrics;

use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use thiserror::Error;
use tracing::debug;

use crate::render::font_metrics::{default_page_config, PageConfig, HELVETICA};

/// File name offered for the report download.
pub const REPORT_FILENAME: &str = "InterviewHawk_Report.pdf";
/// First line of every rendered report.
pub const REPORT_HEADER: &str = "INTERVIEWHAWK REPORT";

const FONT_RESOURCE: &str = "F1";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// A rendered report, held in memory for a one-shot download.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub bytes: Bytes,
    pub filename: &'static str,
}

/// Renders the grading text into a PDF, prefixed with the report header.
pub fn render_report(report: &str) -> Result<ReportDocument, RenderError> {
    render(&format!("{REPORT_HEADER}\n\n{report}"))
}

/// Renders arbitrary text into a PDF.
pub fn render(text: &str) -> Result<ReportDocument, RenderError> {
    let config = default_page_config();
    let lines = layout_lines(&to_single_byte(text), &config);
    let pages: Vec<Vec<Vec<u8>>> = lines
        .chunks(config.lines_per_page())
        .map(|chunk| chunk.iter().map(|line| encode_line(line)).collect())
        .collect();

    let bytes = build_pdf(&pages, &config)?;
    debug!("Rendered report: {} pages, {} bytes", pages.len().max(1), bytes.len());

    Ok(ReportDocument {
        bytes: Bytes::from(bytes),
        filename: REPORT_FILENAME,
    })
}

/// Lossy conversion to the Latin-1 range: anything wider becomes `?`.
pub fn to_single_byte(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\t' => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

fn layout_lines(text: &str, config: &PageConfig) -> Vec<String> {
    let max_width = config.text_width_em();
    text.split('\n')
        .flat_map(|paragraph| HELVETICA.wrap(paragraph, max_width))
        .collect()
}

/// Every char is already in U+0000..=U+00FF, so the code point is the byte.
fn encode_line(line: &str) -> Vec<u8> {
    line.chars().map(|c| c as u32 as u8).collect()
}

/// Writes encoded text lines into a PDF, one `Vec` of lines per page.
/// An empty page list still produces one blank page.
pub(crate) fn build_pdf(pages: &[Vec<Vec<u8>>], config: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_RESOURCE => font_id,
        },
    });

    let blank: Vec<Vec<u8>> = Vec::new();
    let page_lines: Vec<&Vec<Vec<u8>>> = if pages.is_empty() {
        vec![&blank]
    } else {
        pages.iter().collect()
    };

    let mut kids: Vec<Object> = Vec::with_capacity(page_lines.len());
    for lines in page_lines {
        let content = page_content(lines, config);
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(count),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(config.width_pt.round() as i64),
            Object::Integer(config.height_pt.round() as i64),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

fn page_content(lines: &[Vec<u8>], config: &PageConfig) -> Content {
    let left = config.margin_pt.round() as i64;
    // Baseline of the first line sits one font size below the top margin.
    let top = config.height_pt - config.margin_pt - config.font_size_pt;

    let mut operations = Vec::with_capacity(lines.len() * 4);
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = (top - i as f32 * config.line_height_pt).round() as i64;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                Object::Integer(config.font_size_pt.round() as i64),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(left), Object::Integer(baseline)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(line.clone(), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}
