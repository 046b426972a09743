//! Opaque-fill burn-in using lopdf.
//!
//! Each page that has masks gets an extra content stream painting one
//! filled rectangle per mask. The page's existing content is wrapped in a
//! `q`/`Q` pair first so graphics state it leaves behind (a scaled CTM, a
//! clip) cannot displace the fills.
//!
//! Masks arrive in top-left-origin page space, as displayed. They are
//! turned back by the page's `/Rotate` and flipped into PDF user space
//! against the page's CropBox, or its MediaBox when no CropBox is set.

use super::strategy::{BurnReport, RedactionStrategy};
use crate::domain::mask::group_by_page;
use crate::domain::{PageBox, QuarterTurn, RedactionMask};
use crate::error::{RedactorError, RedactorResult};
use std::io::Write;
use tracing::{debug, warn};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Guards against cyclic `Parent` chains when resolving inherited entries.
const MAX_TREE_DEPTH: usize = 32;

/// Burns masks as opaque filled rectangles drawn over the page content.
///
/// The covered text stays in the original content streams; this strategy
/// changes what is rendered, not what is extractable.
#[derive(Debug, Clone, Default)]
pub struct OverlayStrategy;

impl OverlayStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl RedactionStrategy for OverlayStrategy {
    fn burn(
        &self,
        input: &[u8],
        masks: &[RedactionMask],
        mut output: &mut dyn Write,
    ) -> RedactorResult<BurnReport> {
        let mut doc = Document::load_mem(input).map_err(|e| RedactorError::PdfProcessing {
            message: "Failed to load PDF with lopdf".to_string(),
            page: None,
            source: Some(Box::new(e)),
        })?;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let mut report = BurnReport {
            pages_processed: page_ids.len(),
            ..Default::default()
        };

        for (page_index, page_masks) in group_by_page(masks) {
            let Some(&page_id) = page_ids.get(page_index) else {
                warn!(
                    page = page_index,
                    page_count = page_ids.len(),
                    masks = page_masks.len(),
                    "mask page out of range, skipping"
                );
                report.masks_skipped += page_masks.len();
                continue;
            };

            let page_box = page_box(&doc, page_id);
            let content = Content {
                operations: fill_operations(&page_box, &page_masks),
            };
            let overlay = content
                .encode()
                .map_err(|e| RedactorError::page("Failed to encode mask content", page_index + 1, e))?;
            append_isolated_content(&mut doc, page_id, overlay)
                .map_err(|e| RedactorError::page("Failed to append mask content", page_index + 1, e))?;

            debug!(page = page_index, masks = page_masks.len(), "masks burned");
            report.pages_modified += 1;
            report.masks_drawn += page_masks.len();
        }

        doc.save_to(&mut output)
            .map_err(|e| RedactorError::PdfProcessing {
                message: "Failed to save redacted PDF".to_string(),
                page: None,
                source: Some(Box::new(e)),
            })?;

        Ok(report)
    }

    fn name(&self) -> &str {
        "Overlay"
    }

    fn removes_text(&self) -> bool {
        false
    }
}

/// Content operators painting `masks` onto a page with the given box.
///
/// Colours ignore alpha; every fill is opaque.
pub fn fill_operations(page_box: &PageBox, masks: &[&RedactionMask]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(masks.len() * 3 + 2);
    operations.push(Operation::new("q", vec![]));

    for mask in masks {
        let [red, green, blue] = mask.color.rgb_f32();
        let rect = page_box.to_user_space(&mask.rect());

        operations.push(Operation::new("rg", vec![red.into(), green.into(), blue.into()]));
        operations.push(Operation::new(
            "re",
            vec![
                rect.x.into(),
                rect.y.into(),
                rect.width.into(),
                rect.height.into(),
            ],
        ));
        operations.push(Operation::new("f", vec![]));
    }

    operations.push(Operation::new("Q", vec![]));
    operations
}

/// The visible box of a page: CropBox, then MediaBox, both inheritable,
/// rotated by the page's inheritable `/Rotate`.
pub fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let bounds = inherited(doc, page_id, b"CropBox")
        .and_then(|value| parse_box(doc, value))
        .or_else(|| inherited(doc, page_id, b"MediaBox").and_then(|value| parse_box(doc, value)))
        .unwrap_or(PageBox::LETTER);

    let rotation = inherited(doc, page_id, b"Rotate")
        .and_then(number)
        .map(|degrees| QuarterTurn::from_degrees(degrees.round() as i64))
        .unwrap_or_default();

    bounds.with_rotation(rotation)
}

/// Looks `key` up on the page, then on its ancestors in the page tree.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

fn parse_box(doc: &Document, value: &Object) -> Option<PageBox> {
    let items = resolve(doc, value).as_array().ok()?;
    if items.len() != 4 {
        return None;
    }

    let corners = items
        .iter()
        .map(|item| number(resolve(doc, item)))
        .collect::<Option<Vec<f32>>>()?;
    Some(PageBox::from_corners(
        corners[0], corners[1], corners[2], corners[3],
    ))
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Wraps the page's current content in `q`/`Q` and appends `overlay` after it.
fn append_isolated_content(
    doc: &mut Document,
    page_id: ObjectId,
    overlay: Vec<u8>,
) -> lopdf::Result<()> {
    let existing = existing_contents(doc, page_id)?;
    let mut contents = Vec::with_capacity(existing.len() + 2);

    let overlay = if existing.is_empty() {
        overlay
    } else {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        [b"\nQ\n".as_slice(), overlay.as_slice()].concat()
    };

    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));
    contents.push(Object::Reference(overlay_id));

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

fn existing_contents(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;

    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}
