//! Test fixtures and PDF builders.
//!
//! Builds small PDFs with lopdf so tests control page sizes and exactly
//! where each line of text is placed.

use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};

/// Font size used for every line.
pub const FONT_SIZE: f32 = 12.0;

/// Left margin of every line, in points.
pub const LEFT_MARGIN: f32 = 72.0;

/// Distance from the top of the page to the first baseline.
pub const TOP_MARGIN: f32 = 72.0;

/// Distance between consecutive baselines.
pub const LINE_SPACING: f32 = 20.0;

/// Builder for multi-page test PDFs with Helvetica text.
///
/// # Example
///
/// ```no_run
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let bytes = TestPdfBuilder::new()
///     .with_line("Contact: 010-1234-5678 thanks")
///     .new_page()
///     .with_line("kim@example.com")
///     .build_bytes()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    pages: Vec<Vec<String>>,
    page_width: f32,
    page_height: f32,
    rotation: Option<i64>,
}

impl TestPdfBuilder {
    /// Creates a builder for A4 pages with one empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            page_width: 595.0,
            page_height: 842.0,
            rotation: None,
        }
    }

    /// Adds a line of text to the current page.
    pub fn with_line(mut self, text: &str) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.push(text.to_string());
        }
        self
    }

    /// Starts a new page.
    pub fn new_page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Sets custom page dimensions in points.
    pub fn with_dimensions(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Sets `/Rotate` on the page tree root, so every page inherits it.
    pub fn with_rotation(mut self, degrees: i64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Baseline of line `index` in top-left-origin page space.
    pub fn baseline(index: usize) -> f32 {
        TOP_MARGIN + index as f32 * LINE_SPACING
    }

    /// Serializes the document.
    pub fn build_bytes(&self) -> Result<Vec<u8>> {
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
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in &self.pages {
            let page_id = self.add_page(&mut doc, pages_id, resources_id, lines)?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.page_width.into(),
                self.page_height.into(),
            ],
        };
        if let Some(degrees) = self.rotation {
            pages.set("Rotate", degrees);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(&self, output_path: &Path) -> Result<PathBuf> {
        std::fs::write(output_path, self.build_bytes()?)?;
        Ok(output_path.to_path_buf())
    }

    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        resources_id: ObjectId,
        lines: &[String],
    ) -> Result<ObjectId> {
        let mut operations = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let baseline = self.page_height - Self::baseline(index);
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
                Operation::new("Td", vec![LEFT_MARGIN.into(), baseline.into()]),
                Operation::new("Tj", vec![Object::string_literal(line.as_str())]),
                Operation::new("ET", vec![]),
            ]);
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "Contents" => content_id,
        }))
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn contact_sheet() -> TestPdfBuilder {
    TestPdfBuilder::new()
        .with_line("Customer Record")
        .with_line("Contact: 010-1234-5678 thanks")
        .with_line("Email: hong@example.com")
        .with_line("Visited on 2023.05.14 meeting")
        .with_line("No personal data on this line")
}

/// A one-page document mixing several kinds of PII with plain text.
pub fn create_contact_sheet(path: &Path) -> Result<PathBuf> {
    contact_sheet().build(path)
}

/// The contact sheet with the page displayed turned by `degrees`.
pub fn create_rotated_contact_sheet(path: &Path, degrees: i64) -> Result<PathBuf> {
    contact_sheet().with_rotation(degrees).build(path)
}

/// A multi-page document with one phone number per page.
pub fn create_multi_page(path: &Path, pages: usize) -> Result<PathBuf> {
    let mut builder = TestPdfBuilder::new();
    for page in 0..pages {
        if page > 0 {
            builder = builder.new_page();
        }
        builder = builder
            .with_line(&format!("Page {}", page + 1))
            .with_line(&format!("Mobile 010-0000-{:04}", page));
    }
    builder.build(path)
}
