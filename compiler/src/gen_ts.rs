use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;
use xidlgen_schema::{Doc, Enum, Interface, Method, Model, Param, ResultCode, WsMap};

use crate::{
    config::CompilerOptions,
    docs::{comment_lines, render_doc},
    error::XidlError,
    parser::ParsedSchema,
    resolver::TypeResolver,
    utils::quote,
    verifier::verify_schema,
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Base class every generated wrapper extends when it has no parent.
pub const ROOT_CLASS: &str = "RootClass";
/// Key under which a lone `return` parameter is found in the result bag.
pub const RETURN_SLOT: &str = "returnval";

const INDENT: &str = "    ";

/// Compiles a verified schema into a TypeScript client module.
///
/// Output groups are always: preamble, enums, interfaces, result codes.
pub fn compile_schema_to_typescript(schema: &ParsedSchema, options: &CompilerOptions) -> Result<String, XidlError> {
    verify_schema(schema)?;
    let generator = TypeScriptGenerator::new(&schema.model, options);
    generator.generate()
}

pub struct TypeScriptGenerator<'a> {
    model:    &'a Model,
    options:  &'a CompilerOptions,
    resolver: TypeResolver<'a>,
}

impl<'a> TypeScriptGenerator<'a> {
    pub fn new(model: &'a Model, options: &'a CompilerOptions) -> Self {
        TypeScriptGenerator {
            model,
            options,
            resolver: TypeResolver::new(model),
        }
    }

    pub fn generate(&self) -> Result<String, XidlError> {
        let mut ts_code: Vec<String> = Vec::new();

        ts_code.push(self.generate_preamble()?);

        for enum_ in &self.model.enums {
            ts_code.push(self.generate_enum(enum_));
        }

        for interface in &self.model.interfaces {
            if interface.is_struct() {
                ts_code.push(self.generate_struct(interface));
            } else {
                ts_code.push(self.generate_class(interface));
            }
        }

        for result in &self.model.results {
            ts_code.push(self.generate_result(result));
        }

        info!(
            enums = self.model.enums.len(),
            interfaces = self.model.interfaces.len(),
            results = self.model.results.len(),
            "generated TypeScript client"
        );

        ts_code.push(String::new());
        Ok(ts_code.join("\n"))
    }

    /// Interface returned by `connect()`, or `None` to hand back the raw root.
    fn entry_interface(&self) -> Result<Option<&'a Interface>, XidlError> {
        match &self.options.entry_interface {
            Some(name) => match self.model.interface(name) {
                Some(interface) if !interface.is_struct() => Ok(Some(interface)),
                _ => Err(XidlError::UnknownEntryInterface(name.clone())),
            },
            None => Ok(self.model.interfaces.iter().find(|i| i.wsmap == WsMap::Global)),
        }
    }

    fn generate_preamble(&self) -> Result<String, XidlError> {
        let entry = self.entry_interface()?.map_or(ROOT_CLASS, |i| i.name.as_str());
        let mut lines: Vec<String> = Vec::new();

        if let Some(header) = &self.options.license_header {
            lines.push(header.trim_end().to_string());
        }
        lines.push("import * as path from \"path\";".to_string());
        lines.push("import { createClientAsync } from \"soap\";".to_string());
        lines.push(String::new());
        lines.push("const errorCodeRegExp = /rc=0x([0-9a-f]{8})/;".to_string());
        lines.push(String::new());
        lines.push("export interface InvokeError extends Error {".to_string());
        lines.push("    code?: number;".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push(format!("export class {} {{", ROOT_CLASS));
        lines.push("    constructor(public readonly __client: any, public readonly __object: string) {}".to_string());
        lines.push(String::new());
        lines.push("    protected __invoke(name: string, args: { [key: string]: any }): Promise<any> {".to_string());
        lines.push("        return new Promise((resolve, reject) => {".to_string());
        lines.push("            this.__client[name](args, (error: any, result: any) => {".to_string());
        lines.push("                if (error) {".to_string());
        lines.push("                    const faultString = error.root?.Envelope?.Body?.Fault?.faultstring;".to_string());
        lines.push("                    if (faultString) {".to_string());
        lines.push("                        error.message = faultString;".to_string());
        lines.push("                        const errorCodeMatch = errorCodeRegExp.exec(faultString);".to_string());
        lines.push("                        if (errorCodeMatch) {".to_string());
        lines.push("                            error.code = parseInt(errorCodeMatch[1], 16);".to_string());
        lines.push("                        }".to_string());
        lines.push("                    }".to_string());
        lines.push("                    reject(error as InvokeError);".to_string());
        lines.push("                } else {".to_string());
        lines.push("                    resolve(result);".to_string());
        lines.push("                }".to_string());
        lines.push("            });".to_string());
        lines.push("        });".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push("export const connect = async (".to_string());
        lines.push(format!("    endpoint = {},", quote(&self.options.default_endpoint)));
        lines.push(format!("    wsdl = path.join(__dirname, {})", quote(&self.options.wsdl_path)));
        lines.push(format!("): Promise<{}> => {{", entry));
        lines.push("    const client: any = await createClientAsync(wsdl, { endpoint });".to_string());
        lines.push(format!(
            "    return new {}(client[{}][{}], \"\");",
            entry,
            quote(&self.options.service),
            quote(&self.options.port)
        ));
        lines.push("};".to_string());
        lines.push(String::new());

        Ok(lines.join("\n"))
    }

    /// SOAP transports enumeration values by name, so members are string-valued.
    fn generate_enum(&self, enum_: &Enum) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.extend(doc_block(&enum_.desc, &[], ""));
        lines.push(format!("export enum {} {{", enum_.name));
        for constant in &enum_.consts {
            lines.extend(doc_block(&constant.desc, &[], INDENT));
            lines.push(format!("{}{} = {},", INDENT, member_name(&constant.name), quote(&constant.name)));
        }
        lines.push("}".to_string());
        lines.push(String::new());
        lines.join("\n")
    }

    fn generate_struct(&self, interface: &Interface) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.extend(doc_block(&interface.desc, &[], ""));
        lines.push(format!("export interface {} {{", interface.name));
        for field in &interface.attributes {
            lines.extend(doc_block(&field.desc, &[], INDENT));
            lines.push(format!(
                "{}{}: {};",
                INDENT,
                member_name(&field.name),
                self.resolver.ts_field_type(field)
            ));
        }
        lines.push("}".to_string());
        lines.push(String::new());
        lines.join("\n")
    }

    fn generate_class(&self, interface: &Interface) -> String {
        let parent = self
            .model
            .parent_of(interface)
            .map_or(ROOT_CLASS, |p| p.name.as_str());

        let mut lines: Vec<String> = Vec::new();
        lines.extend(doc_block(&interface.desc, &[], ""));
        lines.push(format!("export class {} extends {} {{", interface.name, parent));
        for (i, method) in interface.methods.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(self.generate_method(interface, method));
        }
        lines.push("}".to_string());
        lines.push(String::new());
        lines.join("\n")
    }

    fn generate_method(&self, interface: &Interface, method: &Method) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();

        let param_docs: Vec<String> = method
            .inputs
            .iter()
            .filter_map(|p| {
                let text = comment_lines(&render_doc(&p.desc)).join(" ");
                (!text.is_empty()).then(|| format!("@param ${} {}", p.name, text))
            })
            .collect();
        lines.extend(doc_block(&method.desc, &param_docs, INDENT));

        let params: Vec<String> = method
            .inputs
            .iter()
            .map(|p| format!("${}: {}", p.name, self.resolver.ts_type(p)))
            .collect();

        let mut args: Vec<String> = method
            .inputs
            .iter()
            .map(|p| format!("{}: {}", quote(&p.name), self.resolver.unwrap_expr(p)))
            .collect();
        if !interface.is_global() {
            args.push(format!("{}: this.__object", quote(&self.options.this_argument)));
        }

        let shape = ReturnShape::of(method);
        let call = format!("{}_{}", interface.name, method.name);

        lines.push(format!(
            "{}{}({}): Promise<{}> {{",
            INDENT,
            method.name,
            params.join(", "),
            self.return_type(&shape)
        ));
        lines.push(format!(
            "{}{}return this.__invoke({}, {{{}}}).then({});",
            INDENT,
            INDENT,
            quote(&call),
            args.join(", "),
            self.return_callback(&shape)
        ));
        lines.push(format!("{}}}", INDENT));
        lines
    }

    fn return_type(&self, shape: &ReturnShape) -> String {
        match shape {
            ReturnShape::Nothing => "null".to_string(),
            ReturnShape::Single(param) => self.resolver.ts_return_type(param),
            ReturnShape::Object(params) => {
                let fields: Vec<String> = params
                    .iter()
                    .map(|p| format!("{}: {}", member_name(&p.name), self.resolver.ts_return_type(p)))
                    .collect();
                format!("{{ {} }}", fields.join("; "))
            }
        }
    }

    fn return_callback(&self, shape: &ReturnShape) -> String {
        match shape {
            ReturnShape::Nothing => "() => null".to_string(),
            ReturnShape::Single(param) => format!("__result => {}", self.resolver.wrap_expr(param, "__result")),
            ReturnShape::Object(params) => {
                let fields: Vec<String> = params
                    .iter()
                    .map(|p| format!("{}: {}", quote(&p.name), self.resolver.wrap_expr(p, "__result")))
                    .collect();
                format!("__result => ({{{}}})", fields.join(", "))
            }
        }
    }

    fn generate_result(&self, result: &ResultCode) -> String {
        let mut lines: Vec<String> = doc_block(&result.desc, &[], "");
        lines.push(format!("export const {} = {};", result.name, result.value));
        lines.join("\n")
    }
}

/// What a generated method resolves to once `return` and `out` are merged.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnShape {
    Nothing,
    Single(Param),
    Object(Vec<Param>),
}

impl ReturnShape {
    /// The `return` parameter always travels as [`RETURN_SLOT`]; when `out`
    /// parameters exist it joins them instead of standing alone.
    pub fn of(method: &Method) -> ReturnShape {
        let returns = method.returns.as_ref().map(|p| Param {
            name: RETURN_SLOT.to_string(),
            ..p.clone()
        });
        match (returns, method.outputs.is_empty()) {
            (None, true) => ReturnShape::Nothing,
            (Some(param), true) => ReturnShape::Single(param),
            (returns, false) => {
                let mut outputs = method.outputs.clone();
                outputs.extend(returns);
                ReturnShape::Object(outputs)
            }
        }
    }
}

fn member_name(name: &str) -> String {
    if IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// A `/** ... */` block for `doc`, or nothing when there is nothing to say.
fn doc_block(doc: &Doc, extra: &[String], indent: &str) -> Vec<String> {
    let mut body = comment_lines(&render_doc(doc));
    if !extra.is_empty() {
        if !body.is_empty() {
            body.push(String::new());
        }
        body.extend(extra.iter().cloned());
    }
    if body.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![format!("{}/**", indent)];
    for line in body {
        if line.is_empty() {
            lines.push(format!("{} *", indent));
        } else {
            lines.push(format!("{} * {}", indent, line));
        }
    }
    lines.push(format!("{} */", indent));
    lines
}
