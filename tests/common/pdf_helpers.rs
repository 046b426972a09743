//! PDF inspection helpers.

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};
use std::path::Path;
use std::sync::Mutex;

/// Serializes tests that open documents through MuPDF.
pub static MUPDF_LOCK: Mutex<()> = Mutex::new(());

/// Decoded content operations of page `page_index`, all streams concatenated.
pub fn page_operations(bytes: &[u8], page_index: usize) -> Result<Vec<Operation>> {
    let doc = Document::load_mem(bytes)?;
    let page_id = *doc
        .get_pages()
        .values()
        .nth(page_index)
        .with_context(|| format!("page {} missing", page_index))?;
    let content = doc.get_page_content(page_id)?;
    Ok(Content::decode(&content)?.operations)
}

/// Operands of every `re` operator on a page, as `[x, y, w, h]`.
pub fn filled_rects(bytes: &[u8], page_index: usize) -> Result<Vec<[f32; 4]>> {
    let rects = page_operations(bytes, page_index)?
        .iter()
        .filter(|op| op.operator == "re")
        .map(|op| {
            let mut values = [0.0; 4];
            for (slot, operand) in values.iter_mut().zip(&op.operands) {
                *slot = as_number(operand);
            }
            values
        })
        .collect();
    Ok(rects)
}

/// Operator names of a page, in order.
pub fn operators(bytes: &[u8], page_index: usize) -> Result<Vec<String>> {
    Ok(page_operations(bytes, page_index)?
        .into_iter()
        .map(|op| op.operator)
        .collect())
}

pub fn as_number(object: &Object) -> f32 {
    match object {
        Object::Integer(value) => *value as f32,
        Object::Real(value) => *value as f32,
        other => panic!("expected a number, got {:?}", other),
    }
}

/// Number of pages in a PDF on disk.
pub fn page_count(pdf_path: &Path) -> Result<usize> {
    Ok(Document::load(pdf_path)?.get_pages().len())
}

/// Validates that a PDF is loadable and has basic structure.
pub fn is_valid_pdf(pdf_path: &Path) -> bool {
    Document::load(pdf_path).is_ok()
}
