use thiserror::Error;

#[derive(Debug, Error)]
pub enum XidlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown parent interface: {parent} for {interface}")]
    UnknownParent {
        interface: String,
        parent:    String,
    },

    #[error("Invalid dir: \"{dir}\" on parameter {param} of {method}")]
    InvalidDirection {
        method: String,
        param:  String,
        dir:    String,
    },

    #[error("Struct {interface} cannot extend {parent}")]
    StructExtends {
        interface: String,
        parent:    String,
    },

    #[error("Interface {interface} cannot extend struct {parent}")]
    ExtendsStruct {
        interface: String,
        parent:    String,
    },

    #[error("The {kind} {name} is defined twice")]
    Duplicate {
        kind: &'static str,
        name: String,
    },

    #[error("Verifier error: no {0} found in schema")]
    EmptyGroup(&'static str),

    #[error("Entry interface {0} is not a declared class")]
    UnknownEntryInterface(String),

    #[error("{source} (at byte {position})")]
    At {
        position: u64,
        #[source]
        source:   Box<XidlError>,
    },
}

impl XidlError {
    /// Attaches a document offset, keeping the innermost one if already set.
    pub fn at(self, position: u64) -> XidlError {
        match self {
            XidlError::At { .. } => self,
            other => XidlError::At {
                position,
                source: Box::new(other),
            },
        }
    }

    /// Strips any position wrapper.
    pub fn kind(&self) -> &XidlError {
        match self {
            XidlError::At { source, .. } => source.kind(),
            other => other,
        }
    }
}
