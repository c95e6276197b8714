use tracing::debug;

use crate::{error::XidlError, parser::ParsedSchema};

/// Returns `Ok(())` if verification passed, or `Err(XidlError::EmptyGroup(_))` otherwise.
///
/// Enumerations and interfaces must always be present. Result codes are only
/// required once the document has declared at least one `result` tag; a
/// schema without any gets no result section at all.
pub fn verify_schema(schema: &ParsedSchema) -> Result<(), XidlError> {
    let model = &schema.model;

    if model.enums.is_empty() {
        return Err(XidlError::EmptyGroup("enums"));
    }
    if model.interfaces.is_empty() {
        return Err(XidlError::EmptyGroup("interfaces"));
    }
    if schema.result_tags > 0 && model.results.is_empty() {
        return Err(XidlError::EmptyGroup("result codes"));
    }

    debug!(
        enums = model.enums.len(),
        interfaces = model.interfaces.len(),
        results = model.results.len(),
        suppressed = model.suppressed.len(),
        "schema verified"
    );
    Ok(())
}
