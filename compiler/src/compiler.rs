use std::io::BufRead;
use std::time::Instant;

use tracing::info;

use crate::{
    config::CompilerOptions,
    error::XidlError,
    gen_ts,
    parser::{parse_reader, ParsedSchema},
    verifier::verify_schema,
};

/// Parse and verify a textual schema.
/// Returns `Err(XidlError)` if tokenization/parsing/verification fails.
pub fn compile_schema(text: &str, options: &CompilerOptions) -> Result<ParsedSchema, XidlError> {
    compile_reader(text.as_bytes(), options)
}

/// Same as [`compile_schema`], streaming the document from `source`.
pub fn compile_reader<R: BufRead>(source: R, options: &CompilerOptions) -> Result<ParsedSchema, XidlError> {
    let started = Instant::now();
    let schema = parse_reader(source, options)?;
    verify_schema(&schema)?;
    info!(
        interfaces = schema.model.interfaces.len(),
        suppressed = schema.model.suppressed.len(),
        enums = schema.model.enums.len(),
        results = schema.model.results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "schema compiled"
    );
    Ok(schema)
}

/// Full pipeline: schema text in, TypeScript client module out.
pub fn compile_schema_to_typescript(text: &str, options: &CompilerOptions) -> Result<String, XidlError> {
    let schema = compile_schema(text, options)?;
    gen_ts::compile_schema_to_typescript(&schema, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0"?>
<idl>
  <library name="VirtualBox">
    <if target="wsdl">
      <enum name="Color"><const name="Red" value="0"/></enum>
    </if>
    <interface name="IShape"/>
    <result name="E_FAIL" value="0x80004005"/>
  </library>
</idl>"#;

    #[test]
    fn test_compile_schema() {
        let schema = compile_schema(SCHEMA, &CompilerOptions::default()).unwrap();
        assert_eq!(schema.model.enums.len(), 1);
        assert_eq!(schema.model.interfaces.len(), 1);
        assert_eq!(schema.model.results.len(), 1);
        assert_eq!(schema.result_tags, 1);
    }

    #[test]
    fn test_other_target_leaves_nothing() {
        let options = CompilerOptions {
            target: "xpidl".to_string(),
            ..CompilerOptions::default()
        };
        let err = compile_schema(SCHEMA, &options).unwrap_err();
        assert!(matches!(err, XidlError::EmptyGroup("enums")));
    }

    #[test]
    fn test_compile_to_typescript() {
        let code = compile_schema_to_typescript(SCHEMA, &CompilerOptions::default()).unwrap();
        assert!(code.contains("export enum Color {"));
        assert!(code.contains("export class IShape extends RootClass {"));
        assert!(code.contains("export const E_FAIL = 0x80004005;"));
    }
}
