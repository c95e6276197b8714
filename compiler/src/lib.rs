//! xidlgen-compiler
//!
//! This crate implements:
//!  1) A streaming tokenizer + parser for XIDL documents,
//!  2) A schema verifier (every output group must have content),
//!  3) Type resolution from schema types to TypeScript,
//!  4) Code generation (`compile_schema_to_typescript` → `String`),
//!  5) Error types (`XidlError`) and run options (`CompilerOptions`).

pub mod error;
pub mod config;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod resolver;
pub mod docs;
pub mod verifier;
pub mod compiler;
pub mod gen_ts;

pub use compiler::compile_reader;
pub use compiler::compile_schema;
pub use compiler::compile_schema_to_typescript;
pub use config::CompilerOptions;
pub use error::XidlError;
pub use parser::ParsedSchema;
