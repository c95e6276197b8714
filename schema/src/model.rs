use std::collections::HashMap;

use serde::Serialize;

use crate::doc::Doc;

/// How an interface is mapped onto the web service (the schema's `wsmap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WsMap {
    /// Instances are addressed through an object handle (the default).
    Managed,
    /// Methods are called without a handle (session/manager entry points).
    Global,
    /// A plain data shape transported by value.
    Struct,
    /// Not exposed over the web service at all.
    Suppress,
}

impl WsMap {
    /// Maps a `wsmap` attribute value. Anything unrecognised is `Managed`.
    pub fn parse(value: Option<&str>) -> WsMap {
        match value {
            Some("global")   => WsMap::Global,
            Some("struct")   => WsMap::Struct,
            Some("suppress") => WsMap::Suppress,
            _                => WsMap::Managed,
        }
    }
}

/// Parameter direction as declared by `<param dir="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    Return,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Direction> {
        match value {
            "in"     => Some(Direction::In),
            "out"    => Some(Direction::Out),
            "return" => Some(Direction::Return),
            _        => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name:     String,
    #[serde(rename = "type")]
    pub type_:    String,
    pub is_array: bool,
    pub desc:     Doc,
}

impl Param {
    pub fn new(name: impl Into<String>, type_: impl Into<String>, is_array: bool) -> Self {
        Param {
            name: name.into(),
            type_: type_.into(),
            is_array,
            desc: Doc::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name:    String,
    #[serde(rename = "in")]
    pub inputs:  Vec<Param>,
    #[serde(rename = "out")]
    pub outputs: Vec<Param>,
    pub returns: Option<Param>,
    pub desc:    Doc,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Method {
            name:    name.into(),
            inputs:  Vec::new(),
            outputs: Vec::new(),
            returns: None,
            desc:    Doc::new(),
        }
    }

    pub fn param_mut(&mut self, direction: Direction, index: usize) -> Option<&mut Param> {
        match direction {
            Direction::In     => self.inputs.get_mut(index),
            Direction::Out    => self.outputs.get_mut(index),
            Direction::Return => self.returns.as_mut(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    pub name:       String,
    /// Name of the already declared parent interface, if any.
    pub parent:     Option<String>,
    pub wsmap:      WsMap,
    pub methods:    Vec<Method>,
    /// Fields of a struct-shaped interface. Always empty for classes.
    pub attributes: Vec<Param>,
    pub desc:       Doc,
}

impl Interface {
    pub fn new(name: impl Into<String>, parent: Option<String>, wsmap: WsMap) -> Self {
        Interface {
            name: name.into(),
            parent,
            wsmap,
            methods: Vec::new(),
            attributes: Vec::new(),
            desc: Doc::new(),
        }
    }

    pub fn is_struct(&self) -> bool {
        self.wsmap == WsMap::Struct
    }

    pub fn is_global(&self) -> bool {
        self.wsmap == WsMap::Global
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Const {
    pub name:  String,
    pub value: String,
    pub desc:  Doc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    pub name:   String,
    pub consts: Vec<Const>,
    pub desc:   Doc,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Enum {
            name:   name.into(),
            consts: Vec::new(),
            desc:   Doc::new(),
        }
    }

    pub fn constant(&self, name: &str) -> Option<&Const> {
        self.consts.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCode {
    pub name:  String,
    pub value: String,
    pub desc:  Doc,
}

/// Everything a single compilation pass learned from the schema.
///
/// Lookups by name go through private indices; the public vectors keep
/// document order, which is also emission order.
#[derive(Debug, Default, Serialize)]
pub struct Model {
    pub interfaces: Vec<Interface>,
    pub enums:      Vec<Enum>,
    pub results:    Vec<ResultCode>,
    /// Interfaces declared with `wsmap="suppress"`. Known by name only.
    pub suppressed: Vec<String>,

    #[serde(skip)]
    interface_index: HashMap<String, usize>,
    #[serde(skip)]
    enum_index:      HashMap<String, usize>,
    #[serde(skip)]
    result_index:    HashMap<String, usize>,
}

impl Model {
    pub fn push_interface(&mut self, interface: Interface) -> usize {
        let index = self.interfaces.len();
        self.interface_index.insert(interface.name.clone(), index);
        self.interfaces.push(interface);
        index
    }

    pub fn push_enum(&mut self, enum_: Enum) -> usize {
        let index = self.enums.len();
        self.enum_index.insert(enum_.name.clone(), index);
        self.enums.push(enum_);
        index
    }

    pub fn push_result(&mut self, result: ResultCode) -> usize {
        let index = self.results.len();
        self.result_index.insert(result.name.clone(), index);
        self.results.push(result);
        index
    }

    pub fn push_suppressed(&mut self, name: impl Into<String>) {
        self.suppressed.push(name.into());
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interface_index.get(name).map(|&i| &self.interfaces[i])
    }

    pub fn enum_named(&self, name: &str) -> Option<&Enum> {
        self.enum_index.get(name).map(|&i| &self.enums[i])
    }

    pub fn result(&self, name: &str) -> Option<&ResultCode> {
        self.result_index.get(name).map(|&i| &self.results[i])
    }

    pub fn is_suppressed(&self, name: &str) -> bool {
        self.suppressed.iter().any(|s| s == name)
    }

    /// True if `name` is taken by any interface, suppressed or not.
    pub fn declares_interface(&self, name: &str) -> bool {
        self.interface_index.contains_key(name) || self.is_suppressed(name)
    }

    pub fn parent_of(&self, interface: &Interface) -> Option<&Interface> {
        interface.parent.as_deref().and_then(|p| self.interface(p))
    }

    /// Interfaces that are emitted as classes, in document order.
    pub fn classes(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|i| !i.is_struct())
    }
}
