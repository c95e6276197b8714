use xidlgen_schema::{Model, Param};

/// Schema primitives and the TypeScript type each one is transported as.
pub const PRIMITIVE_TYPES: [(&str, &str); 12] = [
    ("boolean",            "boolean"),
    ("octet",              "number"),
    ("short",              "number"),
    ("unsigned short",     "number"),
    ("long",               "number"),
    ("unsigned long",      "number"),
    ("long long",          "number"),
    ("unsigned long long", "number"),
    ("float",              "number"),
    ("double",             "number"),
    ("wstring",            "string"),
    ("uuid",               "string"),
];

/// Type for anything the compiler cannot classify.
pub const DYNAMIC_TYPE: &str = "any";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass<'m> {
    Primitive(&'static str),
    /// An interface emitted as a wrapper class around an object handle.
    Class(&'m str),
    /// An interface emitted as a plain data shape.
    Struct(&'m str),
    Enum(&'m str),
    Unknown,
}

pub fn primitive_type(type_name: &str) -> Option<&'static str> {
    PRIMITIVE_TYPES
        .iter()
        .find(|(schema, _)| *schema == type_name)
        .map(|(_, ts)| *ts)
}

/// Classifies parameter and attribute types against the finished model.
#[derive(Clone, Copy)]
pub struct TypeResolver<'m> {
    model: &'m Model,
}

impl<'m> TypeResolver<'m> {
    pub fn new(model: &'m Model) -> Self {
        TypeResolver { model }
    }

    pub fn classify(&self, type_name: &str) -> TypeClass<'m> {
        if let Some(ts) = primitive_type(type_name) {
            return TypeClass::Primitive(ts);
        }
        if let Some(interface) = self.model.interface(type_name) {
            return if interface.is_struct() {
                TypeClass::Struct(&interface.name)
            } else {
                TypeClass::Class(&interface.name)
            };
        }
        if let Some(enum_) = self.model.enum_named(type_name) {
            return TypeClass::Enum(&enum_.name);
        }
        TypeClass::Unknown
    }

    pub fn is_class(&self, type_name: &str) -> bool {
        matches!(self.classify(type_name), TypeClass::Class(_))
    }

    /// TypeScript type of a parameter as seen by callers of generated methods.
    pub fn ts_type(&self, param: &Param) -> String {
        self.annotate(param, false)
    }

    /// TypeScript type of a returned value. A missing object reference comes
    /// back as `null`, a missing array as `[]`.
    pub fn ts_return_type(&self, param: &Param) -> String {
        let ts = self.annotate(param, false);
        if !param.is_array && self.is_class(&param.type_) {
            format!("{} | null", ts)
        } else {
            ts
        }
    }

    /// TypeScript type of a struct field. Structs travel by value, so object
    /// references inside them stay raw handles.
    pub fn ts_field_type(&self, param: &Param) -> String {
        self.annotate(param, true)
    }

    fn annotate(&self, param: &Param, raw_handles: bool) -> String {
        // Byte arrays are transported base64-encoded.
        if param.is_array && param.type_ == "octet" {
            return "string".to_string();
        }
        let element = match self.classify(&param.type_) {
            TypeClass::Primitive(ts) => ts,
            TypeClass::Class(_) if raw_handles => "string",
            TypeClass::Class(name) | TypeClass::Struct(name) | TypeClass::Enum(name) => name,
            TypeClass::Unknown => DYNAMIC_TYPE,
        };
        if param.is_array {
            format!("{}[]", element)
        } else {
            element.to_string()
        }
    }

    /// Expression placing a caller's argument into the call's argument bag.
    pub fn unwrap_expr(&self, param: &Param) -> String {
        let value = format!("${}", param.name);
        if !self.is_class(&param.type_) {
            return value;
        }
        if param.is_array {
            format!("{value} ? {value}.map(object => object.__object) : null")
        } else {
            format!("{value} ? {value}.__object : null")
        }
    }

    /// Expression turning `source.<name>` of a result bag into a typed value.
    pub fn wrap_expr(&self, param: &Param, source: &str) -> String {
        let value = format!("{}.{}", source, param.name);
        let TypeClass::Class(class) = self.classify(&param.type_) else {
            return value;
        };
        if param.is_array {
            format!(
                "{value} ? {value}.map((object: string) => new {class}(this.__client, object)) : []"
            )
        } else {
            format!("{value} ? new {class}(this.__client, {value}) : null")
        }
    }
}
