//! Plain text rendering for HWP documents.

use crate::error::Result;
use crate::model::Document;

use super::{CleanupPipeline, RenderOptions};

/// Convert a document to plain text.
///
/// Blocks are separated by blank lines; table cells by tabs.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = doc.plain_text();

    if let Some(ref cleanup_options) = options.cleanup {
        let pipeline = CleanupPipeline::new(cleanup_options.clone());
        output = pipeline.process(&output);
    }

    Ok(output.trim().to_string())
}
