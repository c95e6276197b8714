//! xidlgen
//!
//! Front door for compiling XIDL schemas into TypeScript SOAP clients.
//!
//! - `compile_schema` / `compile_schema_to_typescript` (re-exported from compiler)
//! - The interface model types (re-exported from schema)
//! - JSON views of a compiled schema for tooling.

use serde::Serialize;

pub use xidlgen_compiler::{
    compile_reader, compile_schema, compile_schema_to_typescript, CompilerOptions, ParsedSchema,
    XidlError,
};
pub use xidlgen_schema::{Enum, Interface, Method, Model, Param, ResultCode, WsMap};

/// Names and counts of everything a schema declared.
#[derive(Debug, Serialize)]
pub struct SchemaSummary<'a> {
    pub interfaces:  Vec<&'a str>,
    pub structs:     Vec<&'a str>,
    pub suppressed:  Vec<&'a str>,
    pub enums:       Vec<&'a str>,
    pub results:     Vec<&'a str>,
    pub methods:     usize,
    pub result_tags: usize,
}

impl<'a> SchemaSummary<'a> {
    pub fn new(schema: &'a ParsedSchema) -> Self {
        let model = &schema.model;
        SchemaSummary {
            interfaces:  model.classes().map(|i| i.name.as_str()).collect(),
            structs:     model.interfaces.iter().filter(|i| i.is_struct()).map(|i| i.name.as_str()).collect(),
            suppressed:  model.suppressed.iter().map(String::as_str).collect(),
            enums:       model.enums.iter().map(|e| e.name.as_str()).collect(),
            results:     model.results.iter().map(|r| r.name.as_str()).collect(),
            methods:     model.classes().map(|i| i.methods.len()).sum(),
            result_tags: schema.result_tags,
        }
    }
}

/// Compile a schema and summarize it as pretty-printed JSON.
pub fn summarize_to_json(text: &str, options: &CompilerOptions) -> Result<String, XidlError> {
    let schema = compile_schema(text, options)?;
    Ok(serde_json::to_string_pretty(&SchemaSummary::new(&schema))?)
}

/// Compile a schema and dump the full interface model as pretty-printed JSON.
pub fn describe_to_json(text: &str, options: &CompilerOptions) -> Result<String, XidlError> {
    let schema = compile_schema(text, options)?;
    Ok(serde_json::to_string_pretty(&schema.model)?)
}

pub mod error {
    pub use xidlgen_compiler::error::XidlError;
}

pub mod schema {
    pub use xidlgen_schema::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SCHEMA: &str = r#"<idl><library name="L">
        <enum name="State"><const name="On" value="1"/></enum>
        <interface name="IHidden" wsmap="suppress"/>
        <interface name="IThing" wsmap="managed">
            <attribute name="state" type="State" readonly="yes"/>
        </interface>
        <interface name="IPair" wsmap="struct"><attribute name="left" type="long"/></interface>
        <result name="E_FAIL" value="0x80004005"/>
    </library></idl>"#;

    #[test]
    fn test_summarize_to_json() {
        let json = summarize_to_json(SCHEMA, &CompilerOptions::default()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["interfaces"], serde_json::json!(["IThing"]));
        assert_eq!(v["structs"], serde_json::json!(["IPair"]));
        assert_eq!(v["suppressed"], serde_json::json!(["IHidden"]));
        assert_eq!(v["enums"], serde_json::json!(["State"]));
        assert_eq!(v["results"], serde_json::json!(["E_FAIL"]));
        assert_eq!(v["methods"], 1);
        assert_eq!(v["result_tags"], 1);
    }

    #[test]
    fn test_describe_to_json() {
        let json = describe_to_json(SCHEMA, &CompilerOptions::default()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        let thing = &v["interfaces"][0];
        assert_eq!(thing["name"], "IThing");
        assert_eq!(thing["wsmap"], "managed");
        assert_eq!(thing["methods"][0]["name"], "getState");
        assert_eq!(thing["methods"][0]["returns"]["type"], "State");
        assert_eq!(v["interfaces"][1]["wsmap"], "struct");
    }

    #[test]
    fn test_errors_pass_through() {
        let err = summarize_to_json("<idl/>", &CompilerOptions::default()).unwrap_err();
        assert!(matches!(err.kind(), XidlError::EmptyGroup("enums")));
    }
}
