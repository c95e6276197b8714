//! Streaming structural parser.
//!
//! The parser is a pushdown automaton over [`TagEvent`]s: every open tag
//! pushes a [`Frame`], every close pops one. Handlers are chosen by
//! [`TagKind`] and mutate the [`Model`] as tags arrive, so the model is
//! complete the moment the last event has been handled.
//!
//! A frame marked `skip` prunes its whole subtree. Child events are still
//! consumed so the stack stays balanced, but they never reach a handler.

use std::io::BufRead;

use tracing::{debug, warn};
use xidlgen_schema::{
    is_sentinel_parent, Direction, Doc, DocNode, Enum, Const, Interface, Method, Model, Param,
    ResultCode, WsMap, EMPTY_INTERFACE_PLACEHOLDER,
};

use crate::{
    config::CompilerOptions,
    error::XidlError,
    tokenizer::{Attributes, TagEvent, TagStream},
    utils::capitalize,
};

/// The closed tag vocabulary this compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Idl,
    Library,
    Application,
    Interface,
    Method,
    Param,
    Enum,
    Const,
    Attribute,
    Result,
    Desc,
    If,
}

impl TagKind {
    pub fn from_name(name: &str) -> Option<TagKind> {
        match name {
            "idl"         => Some(TagKind::Idl),
            "library"     => Some(TagKind::Library),
            "application" => Some(TagKind::Application),
            "interface"   => Some(TagKind::Interface),
            "method"      => Some(TagKind::Method),
            "param"       => Some(TagKind::Param),
            "enum"        => Some(TagKind::Enum),
            "const"       => Some(TagKind::Const),
            "attribute"   => Some(TagKind::Attribute),
            "result"      => Some(TagKind::Result),
            "desc"        => Some(TagKind::Desc),
            "if"          => Some(TagKind::If),
            _             => None,
        }
    }
}

/// The model entity a frame contributed, used to attach documentation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeRef {
    Interface(usize),
    Method { interface: usize, method: usize },
    Param { interface: usize, method: usize, direction: Direction, index: usize },
    Accessors { interface: usize, getter: usize, setter: Option<usize> },
    Field { interface: usize, index: usize },
    Enum(usize),
    Const { enum_: usize, index: usize },
    Result(usize),
}

#[derive(Debug)]
struct Frame {
    tag:        String,
    kind:       Option<TagKind>,
    skip:       bool,
    object:     Option<NodeRef>,
    /// Present only while capturing documentation.
    content:    Option<Doc>,
    /// Kept for documentation markup, where attributes drive rendering.
    attributes: Vec<(String, String)>,
}

impl Frame {
    fn new(tag: &str, kind: Option<TagKind>) -> Self {
        Frame {
            tag: tag.to_string(),
            kind,
            skip: false,
            object: None,
            content: None,
            attributes: Vec::new(),
        }
    }

    fn skipped(tag: &str, kind: Option<TagKind>) -> Self {
        Frame {
            skip: true,
            ..Frame::new(tag, kind)
        }
    }
}

/// Result of a full parse: the model plus bookkeeping the verifier needs.
#[derive(Debug)]
pub struct ParsedSchema {
    pub model:       Model,
    /// `result` tags handled outside documentation, whether kept or dropped.
    pub result_tags: usize,
}

pub struct SchemaParser<'o> {
    options:     &'o CompilerOptions,
    stack:       Vec<Frame>,
    model:       Model,
    result_tags: usize,
}

impl<'o> SchemaParser<'o> {
    pub fn new(options: &'o CompilerOptions) -> Self {
        SchemaParser {
            options,
            stack: Vec::new(),
            model: Model::default(),
            result_tags: 0,
        }
    }

    pub fn handle(&mut self, event: TagEvent) -> Result<(), XidlError> {
        match event {
            TagEvent::Open { name, attributes } => self.open_tag(&name, attributes),
            TagEvent::Text(text) => {
                self.text(&text);
                Ok(())
            }
            TagEvent::Close => {
                self.close_tag();
                Ok(())
            }
        }
    }

    pub fn open_tag(&mut self, name: &str, attributes: Attributes) -> Result<(), XidlError> {
        let (parent_skip, parent_captures) = match self.stack.last() {
            Some(parent) => (parent.skip, parent.content.is_some()),
            None => (false, false),
        };

        let frame = if parent_skip {
            Frame::skipped(name, None)
        } else if parent_captures {
            // Markup inside documentation is recorded, never dispatched.
            Frame {
                content: Some(Doc::new()),
                attributes: attributes.into_pairs(),
                ..Frame::new(name, None)
            }
        } else {
            match TagKind::from_name(name) {
                Some(kind) => {
                    let frame = self.dispatch(name, kind, &attributes)?;
                    if frame.skip {
                        debug!(tag = name, "pruning subtree");
                    }
                    frame
                }
                None => {
                    debug!(tag = name, "pruning unrecognised subtree");
                    Frame::skipped(name, None)
                }
            }
        };

        self.stack.push(frame);
        Ok(())
    }

    pub fn text(&mut self, text: &str) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if frame.skip {
            return;
        }
        if let Some(content) = frame.content.as_mut() {
            if let Some(DocNode::Text(last)) = content.last_mut() {
                last.text.push_str(text);
            } else {
                content.push(DocNode::text(text));
            }
        }
    }

    pub fn close_tag(&mut self) {
        let Some(frame) = self.stack.pop() else {
            warn!("close tag without a matching open tag");
            return;
        };
        if frame.skip {
            return;
        }
        let Some(content) = frame.content else {
            return;
        };

        if frame.kind == Some(TagKind::Desc) {
            // Conditional sections may sit between a declaration and its desc.
            match self.stack.iter().rev().find_map(|f| f.object) {
                Some(target) => self.attach_doc(target, content),
                None => debug!("dropping documentation with no owning declaration"),
            }
        } else if let Some(parent) = self.stack.last_mut() {
            if let Some(parent_content) = parent.content.as_mut() {
                parent_content.push(DocNode::element(frame.tag, frame.attributes, content));
            }
        }
    }

    pub fn finish(self) -> ParsedSchema {
        if !self.stack.is_empty() {
            warn!(open = self.stack.len(), "document ended with unclosed tags");
        }
        ParsedSchema {
            model:       self.model,
            result_tags: self.result_tags,
        }
    }

    fn parent_kind(&self) -> Option<TagKind> {
        self.stack.last().and_then(|f| f.kind)
    }

    fn enclosing_interface(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|f| match f.object {
            Some(NodeRef::Interface(i)) => Some(i),
            _ => None,
        })
    }

    fn enclosing_method(&self) -> Option<(usize, usize)> {
        self.stack.iter().rev().find_map(|f| match f.object {
            Some(NodeRef::Method { interface, method }) => Some((interface, method)),
            _ => None,
        })
    }

    fn enclosing_enum(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|f| match f.object {
            Some(NodeRef::Enum(i)) => Some(i),
            _ => None,
        })
    }

    fn dispatch(&mut self, tag: &str, kind: TagKind, attributes: &Attributes) -> Result<Frame, XidlError> {
        let mut frame = Frame::new(tag, Some(kind));
        match kind {
            TagKind::Idl => {}
            TagKind::Library => {
                frame.skip = self.parent_kind() != Some(TagKind::Idl);
            }
            TagKind::Application => {
                frame.skip = self.parent_kind() != Some(TagKind::Library);
            }
            TagKind::If => {
                frame.skip = attributes.get("target") != Some(self.options.target.as_str());
            }
            TagKind::Interface => match self.declare_interface(attributes)? {
                Some(index) => frame.object = Some(NodeRef::Interface(index)),
                None => frame.skip = true,
            },
            TagKind::Method => match self.declare_method(attributes) {
                Some(object) => frame.object = Some(object),
                None => frame.skip = true,
            },
            TagKind::Param => match self.declare_param(attributes)? {
                Some(object) => frame.object = Some(object),
                None => frame.skip = true,
            },
            TagKind::Enum => match self.declare_enum(attributes)? {
                Some(object) => frame.object = Some(object),
                None => frame.skip = true,
            },
            TagKind::Const => match self.declare_const(attributes)? {
                Some(object) => frame.object = Some(object),
                None => frame.skip = true,
            },
            TagKind::Attribute => match self.declare_attribute(attributes) {
                Some(object) => frame.object = Some(object),
                None => frame.skip = true,
            },
            TagKind::Result => match self.declare_result(attributes)? {
                Some(object) => frame.object = Some(object),
                None => frame.skip = true,
            },
            TagKind::Desc => {
                frame.content = Some(Doc::new());
            }
        }
        Ok(frame)
    }

    fn declare_interface(&mut self, attributes: &Attributes) -> Result<Option<usize>, XidlError> {
        let Some(name) = attributes.get("name") else {
            warn!("interface without a name");
            return Ok(None);
        };
        let wsmap = WsMap::parse(attributes.get("wsmap"));
        let extends = attributes.get("extends").filter(|e| !e.is_empty());

        if self.model.declares_interface(name) {
            return Err(XidlError::Duplicate {
                kind: "interface",
                name: name.to_string(),
            });
        }

        let parent = match extends {
            None => None,
            Some(p) if is_sentinel_parent(p) => None,
            Some(p) if wsmap == WsMap::Struct => {
                return Err(XidlError::StructExtends {
                    interface: name.to_string(),
                    parent:    p.to_string(),
                });
            }
            Some(p) if self.model.is_suppressed(p) => None,
            Some(p) if self.model.interface(p).is_some_and(|i| i.is_struct()) => {
                return Err(XidlError::ExtendsStruct {
                    interface: name.to_string(),
                    parent:    p.to_string(),
                });
            }
            Some(p) if self.model.interface(p).is_some() => Some(p.to_string()),
            Some(p) => {
                return Err(XidlError::UnknownParent {
                    interface: name.to_string(),
                    parent:    p.to_string(),
                });
            }
        };

        if wsmap == WsMap::Suppress {
            debug!(interface = name, "interface is not exposed to the web service");
            self.model.push_suppressed(name);
            return Ok(None);
        }

        Ok(Some(self.model.push_interface(Interface::new(name, parent, wsmap))))
    }

    fn declare_method(&mut self, attributes: &Attributes) -> Option<NodeRef> {
        let interface = self.enclosing_interface()?;
        let name = attributes.get("name")?;
        let owner = &mut self.model.interfaces[interface];
        if owner.is_struct() {
            debug!(interface = %owner.name, method = name, "struct-shaped interfaces carry no methods");
            return None;
        }
        owner.methods.push(Method::new(name));
        Some(NodeRef::Method {
            interface,
            method: owner.methods.len() - 1,
        })
    }

    fn declare_param(&mut self, attributes: &Attributes) -> Result<Option<NodeRef>, XidlError> {
        let Some((interface, method)) = self.enclosing_method() else {
            return Ok(None);
        };
        let (Some(name), Some(type_)) = (attributes.get("name"), attributes.get("type")) else {
            warn!("parameter without a name or type");
            return Ok(None);
        };
        let target = &mut self.model.interfaces[interface].methods[method];

        let dir = attributes.get("dir").unwrap_or_default();
        let direction = Direction::parse(dir).ok_or_else(|| XidlError::InvalidDirection {
            method: target.name.clone(),
            param:  name.to_string(),
            dir:    dir.to_string(),
        })?;

        let param = Param::new(name, type_, attributes.flag("safearray"));
        let index = match direction {
            Direction::In => {
                target.inputs.push(param);
                target.inputs.len() - 1
            }
            Direction::Out => {
                target.outputs.push(param);
                target.outputs.len() - 1
            }
            Direction::Return => {
                if target.returns.is_some() {
                    return Err(XidlError::Duplicate {
                        kind: "return parameter of",
                        name: target.name.clone(),
                    });
                }
                target.returns = Some(param);
                0
            }
        };

        Ok(Some(NodeRef::Param {
            interface,
            method,
            direction,
            index,
        }))
    }

    fn declare_enum(&mut self, attributes: &Attributes) -> Result<Option<NodeRef>, XidlError> {
        let Some(name) = attributes.get("name") else {
            warn!("enum without a name");
            return Ok(None);
        };
        if self.model.enum_named(name).is_some() {
            return Err(XidlError::Duplicate {
                kind: "enum",
                name: name.to_string(),
            });
        }
        Ok(Some(NodeRef::Enum(self.model.push_enum(Enum::new(name)))))
    }

    fn declare_const(&mut self, attributes: &Attributes) -> Result<Option<NodeRef>, XidlError> {
        let Some(enum_) = self.enclosing_enum() else {
            return Ok(None);
        };
        let (Some(name), Some(value)) = (attributes.get("name"), attributes.get("value")) else {
            warn!("enum constant without a name or value");
            return Ok(None);
        };
        let target = &mut self.model.enums[enum_];
        if target.constant(name).is_some() {
            return Err(XidlError::Duplicate {
                kind: "constant",
                name: format!("{}.{}", target.name, name),
            });
        }
        target.consts.push(Const {
            name:  name.to_string(),
            value: value.to_string(),
            desc:  Doc::new(),
        });
        Ok(Some(NodeRef::Const {
            enum_,
            index: target.consts.len() - 1,
        }))
    }

    fn declare_attribute(&mut self, attributes: &Attributes) -> Option<NodeRef> {
        let interface = self.enclosing_interface()?;
        let name = attributes.get("name")?;
        if name == EMPTY_INTERFACE_PLACEHOLDER {
            return None;
        }
        let Some(type_) = attributes.get("type") else {
            warn!(attribute = name, "attribute without a type");
            return None;
        };
        let is_array = attributes.flag("safearray");
        let owner = &mut self.model.interfaces[interface];

        if owner.is_struct() {
            owner.attributes.push(Param::new(name, type_, is_array));
            return Some(NodeRef::Field {
                interface,
                index: owner.attributes.len() - 1,
            });
        }

        let base_name = capitalize(name);
        let mut getter = Method::new(format!("get{}", base_name));
        getter.returns = Some(Param::new(name, type_, is_array));
        owner.methods.push(getter);
        let getter = owner.methods.len() - 1;

        let setter = if attributes.flag("readonly") {
            None
        } else {
            let mut setter = Method::new(format!("set{}", base_name));
            setter.inputs.push(Param::new(name, type_, is_array));
            owner.methods.push(setter);
            Some(owner.methods.len() - 1)
        };

        Some(NodeRef::Accessors {
            interface,
            getter,
            setter,
        })
    }

    fn declare_result(&mut self, attributes: &Attributes) -> Result<Option<NodeRef>, XidlError> {
        self.result_tags += 1;
        if !matches!(self.parent_kind(), Some(TagKind::Library) | Some(TagKind::Application)) {
            debug!(result = attributes.get("name"), "dropping result code outside the library section");
            return Ok(None);
        }
        let (Some(name), Some(value)) = (attributes.get("name"), attributes.get("value")) else {
            warn!("result code without a name or value");
            return Ok(None);
        };
        if self.model.result(name).is_some() {
            return Err(XidlError::Duplicate {
                kind: "result code",
                name: name.to_string(),
            });
        }
        let index = self.model.push_result(ResultCode {
            name:  name.to_string(),
            value: value.to_string(),
            desc:  Doc::new(),
        });
        Ok(Some(NodeRef::Result(index)))
    }

    fn attach_doc(&mut self, target: NodeRef, doc: Doc) {
        let model = &mut self.model;
        match target {
            NodeRef::Interface(i) => model.interfaces[i].desc.extend(doc),
            NodeRef::Method { interface, method } => {
                model.interfaces[interface].methods[method].desc.extend(doc)
            }
            NodeRef::Param { interface, method, direction, index } => {
                if let Some(param) = model.interfaces[interface].methods[method].param_mut(direction, index) {
                    param.desc.extend(doc);
                }
            }
            NodeRef::Accessors { interface, getter, setter } => {
                let methods = &mut model.interfaces[interface].methods;
                if let Some(setter) = setter {
                    methods[setter].desc.extend(doc.iter().cloned());
                }
                methods[getter].desc.extend(doc);
            }
            NodeRef::Field { interface, index } => {
                model.interfaces[interface].attributes[index].desc.extend(doc)
            }
            NodeRef::Enum(i) => model.enums[i].desc.extend(doc),
            NodeRef::Const { enum_, index } => model.enums[enum_].consts[index].desc.extend(doc),
            NodeRef::Result(i) => model.results[i].desc.extend(doc),
        }
    }
}

/// Parses pre-tokenized events.
pub fn parse_events<I>(events: I, options: &CompilerOptions) -> Result<ParsedSchema, XidlError>
where
    I: IntoIterator<Item = TagEvent>,
{
    let mut parser = SchemaParser::new(options);
    for event in events {
        parser.handle(event)?;
    }
    Ok(parser.finish())
}

/// Streams a schema from `source`, attaching byte offsets to fatal errors.
pub fn parse_reader<R: BufRead>(source: R, options: &CompilerOptions) -> Result<ParsedSchema, XidlError> {
    let mut stream = TagStream::new(source);
    let mut parser = SchemaParser::new(options);
    while let Some(event) = stream.next_event().map_err(|e| e.at(stream.position()))? {
        parser.handle(event).map_err(|e| e.at(stream.position()))?;
    }
    Ok(parser.finish())
}

pub fn parse_schema(text: &str, options: &CompilerOptions) -> Result<ParsedSchema, XidlError> {
    parse_reader(text.as_bytes(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidlgen_schema::DocElement;

    fn parse(xml: &str) -> Result<Model, XidlError> {
        parse_schema(xml, &CompilerOptions::default()).map(|parsed| parsed.model)
    }

    fn wrap(body: &str) -> String {
        format!(r#"<idl><library name="Test">{}</library></idl>"#, body)
    }

    #[test]
    fn test_interface_inheritance() {
        let model = parse(&wrap(
            r#"<interface name="IShape"/>
               <interface name="IBox" extends="IShape"/>
               <interface name="IError" extends="$errorinfo"/>
               <interface name="IOther" extends="$unknown"/>"#,
        ))
        .unwrap();
        assert_eq!(model.interfaces.len(), 4);
        assert_eq!(model.interface("IShape").unwrap().parent, None);
        assert_eq!(model.interface("IBox").unwrap().parent.as_deref(), Some("IShape"));
        assert_eq!(model.interface("IError").unwrap().parent, None);
        assert_eq!(model.interface("IOther").unwrap().parent, None);
    }

    #[test]
    fn test_unknown_parent_is_fatal() {
        let err = parse(&wrap(
            r#"<interface name="IBox" extends="IShape"/><interface name="IShape"/>"#,
        ))
        .unwrap_err();
        match err.kind() {
            XidlError::UnknownParent { interface, parent } => {
                assert_eq!(interface, "IBox");
                assert_eq!(parent, "IShape");
            }
            other => panic!("expected UnknownParent but got {:?}", other),
        }
        assert!(matches!(err, XidlError::At { .. }));
        assert!(err.to_string().contains("Unknown parent interface: IShape for IBox"));
    }

    #[test]
    fn test_struct_cannot_extend() {
        let err = parse(&wrap(
            r#"<interface name="IShape"/><interface name="IPoint" wsmap="struct" extends="IShape"/>"#,
        ))
        .unwrap_err();
        assert!(matches!(err.kind(), XidlError::StructExtends { .. }), "got {:?}", err);
    }

    #[test]
    fn test_struct_with_sentinel_parent_is_plain_struct() {
        let model = parse(&wrap(
            r#"<interface name="IPoint" wsmap="struct" extends="$unknown">
                 <attribute name="x" type="long"/>
                 <attribute name="y" type="long" readonly="yes"/>
                 <method name="ignored"/>
               </interface>"#,
        ))
        .unwrap();
        let point = model.interface("IPoint").unwrap();
        assert!(point.is_struct());
        assert_eq!(point.parent, None);
        assert!(point.methods.is_empty());
        let fields: Vec<&str> = point.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(fields, vec!["x", "y"]);
    }

    #[test]
    fn test_class_cannot_extend_struct() {
        let err = parse(&wrap(
            r#"<interface name="IPoint" wsmap="struct"><attribute name="x" type="long"/></interface>
               <interface name="IShape" extends="IPoint"/>"#,
        ))
        .unwrap_err();
        match err.kind() {
            XidlError::ExtendsStruct { interface, parent } => {
                assert_eq!(interface, "IShape");
                assert_eq!(parent, "IPoint");
            }
            other => panic!("expected ExtendsStruct but got {:?}", other),
        }
    }

    #[test]
    fn test_documentation_inside_conditional_section() {
        let model = parse(&wrap(
            r#"<interface name="IBox">
                 <if target="wsdl"><desc>Hello</desc></if>
                 <if target="xpcom"><desc>Not for SOAP</desc></if>
                 <method name="m">
                   <if target="wsdl"><param name="a" type="long" dir="in"/></if>
                 </method>
               </interface>"#,
        ))
        .unwrap();
        let ibox = model.interface("IBox").unwrap();
        assert_eq!(ibox.desc, vec![DocNode::text("Hello")]);
        assert_eq!(ibox.methods[0].inputs.len(), 1);
    }

    #[test]
    fn test_method_parameters_by_direction() {
        let model = parse(&wrap(
            r#"<interface name="IDisplay">
                 <method name="getScreenResolution">
                   <param name="screenId" type="unsigned long" dir="in"/>
                   <param name="width" type="unsigned long" dir="out"/>
                   <param name="height" type="unsigned long" dir="out"/>
                 </method>
                 <method name="takeScreenShotToArray">
                   <param name="screenData" type="octet" dir="return" safearray="yes"/>
                 </method>
               </interface>"#,
        ))
        .unwrap();
        let display = model.interface("IDisplay").unwrap();
        let resolution = &display.methods[0];
        assert_eq!(resolution.inputs.len(), 1);
        assert_eq!(resolution.outputs.len(), 2);
        assert!(resolution.returns.is_none());
        let shot = display.methods[1].returns.as_ref().unwrap();
        assert_eq!(shot.type_, "octet");
        assert!(shot.is_array);
    }

    #[test]
    fn test_invalid_direction_is_fatal() {
        let err = parse(&wrap(
            r#"<interface name="IBox"><method name="m"><param name="a" type="long" dir="inout"/></method></interface>"#,
        ))
        .unwrap_err();
        match err.kind() {
            XidlError::InvalidDirection { method, param, dir } => {
                assert_eq!((method.as_str(), param.as_str(), dir.as_str()), ("m", "a", "inout"));
            }
            other => panic!("expected InvalidDirection but got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_accessors() {
        let model = parse(&wrap(
            r#"<interface name="IShape">
                 <attribute name="area" type="long" readonly="yes"/>
                 <attribute name="name" type="wstring"/>
                 <attribute name="midlDoesNotLikeEmptyInterfaces" type="boolean"/>
               </interface>"#,
        ))
        .unwrap();
        let names: Vec<&str> = model.interface("IShape").unwrap().methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getArea", "getName", "setName"]);

        let setter = &model.interface("IShape").unwrap().methods[2];
        assert_eq!(setter.inputs[0].name, "name");
        assert!(setter.returns.is_none());
    }

    #[test]
    fn test_enum_constants_in_order() {
        let model = parse(&wrap(
            r#"<enum name="Color"><const name="Red" value="0"/><const name="Green" value="1"/></enum>"#,
        ))
        .unwrap();
        let color = model.enum_named("Color").unwrap();
        let consts: Vec<(&str, &str)> = color.consts.iter().map(|c| (c.name.as_str(), c.value.as_str())).collect();
        assert_eq!(consts, vec![("Red", "0"), ("Green", "1")]);
    }

    #[test]
    fn test_result_only_directly_under_section() {
        let model = parse(
            r#"<idl>
                 <result name="E_ROOT" value="1"/>
                 <library name="VirtualBox">
                   <result name="E_LIB" value="0x80BB0001"/>
                   <application name="VirtualBox">
                     <result name="E_APP" value="0x80BB0002"/>
                     <interface name="IBox"><result name="E_NESTED" value="3"/></interface>
                   </application>
                 </library>
               </idl>"#,
        )
        .unwrap();
        let names: Vec<&str> = model.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["E_LIB", "E_APP"]);
    }

    #[test]
    fn test_conditional_sections_follow_target() {
        let xml = wrap(
            r#"<if target="wsdl"><interface name="IWsdl"/></if>
               <if target="xpcom"><interface name="IXpcom"/></if>"#,
        );
        let model = parse(&xml).unwrap();
        assert!(model.interface("IWsdl").is_some());
        assert!(model.interface("IXpcom").is_none());

        let options = CompilerOptions {
            target: "xpcom".to_string(),
            ..CompilerOptions::default()
        };
        let model = parse_schema(&xml, &options).unwrap().model;
        assert!(model.interface("IWsdl").is_none());
        assert!(model.interface("IXpcom").is_some());
    }

    #[test]
    fn test_unknown_tags_prune_subtree() {
        let model = parse(&wrap(
            r#"<module name="x"><interface name="IHidden"/></module><interface name="IVisible"/>"#,
        ))
        .unwrap();
        assert!(model.interface("IHidden").is_none());
        assert!(model.interface("IVisible").is_some());
    }

    #[test]
    fn test_library_outside_idl_is_skipped() {
        let model = parse(r#"<idl><if target="wsdl"><library><interface name="IBox"/></library></if></idl>"#).unwrap();
        assert!(model.interfaces.is_empty());
    }

    #[test]
    fn test_suppressed_interfaces() {
        let model = parse(&wrap(
            r#"<interface name="IInternal" wsmap="suppress"><method name="m"/></interface>
               <interface name="IChild" extends="IInternal"/>
               <interface name="IManager" wsmap="global"/>"#,
        ))
        .unwrap();
        assert!(model.interface("IInternal").is_none());
        assert!(model.is_suppressed("IInternal"));
        assert_eq!(model.interface("IChild").unwrap().parent, None);
        assert!(model.interface("IManager").unwrap().is_global());
    }

    #[test]
    fn test_duplicate_interface_is_fatal() {
        let err = parse(&wrap(r#"<interface name="IBox"/><interface name="IBox"/>"#)).unwrap_err();
        assert!(matches!(err.kind(), XidlError::Duplicate { kind: "interface", .. }), "got {:?}", err);
    }

    #[test]
    fn test_missing_names_are_tolerated() {
        let model = parse(&wrap(
            r#"<interface><method name="m"/></interface>
               <method name="orphan"/>
               <const name="Stray" value="1"/>
               <interface name="IBox"/>"#,
        ))
        .unwrap();
        assert_eq!(model.interfaces.len(), 1);
        assert!(model.interface("IBox").unwrap().methods.is_empty());
    }

    #[test]
    fn test_documentation_is_attached_with_markup() {
        let model = parse(&wrap(
            r##"<interface name="IBox">
                 <desc>A box. <link to="#resize"/> <note internal="yes">hidden</note></desc>
                 <method name="resize">
                   <desc>Resizes.</desc>
                   <param name="w" type="long" dir="in"><desc>Width.</desc></param>
                 </method>
                 <attribute name="label" type="wstring"><desc>Label text.</desc></attribute>
               </interface>"##,
        ))
        .unwrap();
        let ibox = model.interface("IBox").unwrap();

        assert_eq!(ibox.desc[0], DocNode::text("A box. "));
        match &ibox.desc[1] {
            DocNode::Element(DocElement { tag, attributes, children }) => {
                assert_eq!(tag, "link");
                assert_eq!(attributes, &vec![("to".to_string(), "#resize".to_string())]);
                assert!(children.is_empty());
            }
            other => panic!("expected link element but got {:?}", other),
        }
        match &ibox.desc[3] {
            DocNode::Element(element) => {
                assert_eq!(element.attribute("internal"), Some("yes"));
                assert_eq!(element.children, vec![DocNode::text("hidden")]);
            }
            other => panic!("expected note element but got {:?}", other),
        }

        let resize = &ibox.methods[0];
        assert_eq!(resize.desc, vec![DocNode::text("Resizes.")]);
        assert_eq!(resize.inputs[0].desc, vec![DocNode::text("Width.")]);

        // Attribute documentation lands on both accessors.
        assert_eq!(ibox.methods[1].name, "getLabel");
        assert_eq!(ibox.methods[1].desc, vec![DocNode::text("Label text.")]);
        assert_eq!(ibox.methods[2].desc, vec![DocNode::text("Label text.")]);
    }

    #[test]
    fn test_result_inside_desc_is_documentation() {
        let parsed = parse_schema(
            &wrap(r#"<interface name="IBox"><desc><result name="E_FAIL">Bad.</result></desc></interface>"#),
            &CompilerOptions::default(),
        )
        .unwrap();
        assert!(parsed.model.results.is_empty());
        assert_eq!(parsed.result_tags, 0);
        let desc = &parsed.model.interface("IBox").unwrap().desc;
        assert!(matches!(&desc[0], DocNode::Element(e) if e.tag == "result"));
    }

    #[test]
    fn test_parse_pre_tokenized_events() {
        let events = crate::tokenizer::tokenize_schema(&wrap(
            r#"<enum name="Color"><const name="Red" value="0"/></enum><interface name="IBox"/>"#,
        ))
        .unwrap();
        let parsed = parse_events(events, &CompilerOptions::default()).unwrap();
        assert_eq!(parsed.model.enums.len(), 1);
        assert!(parsed.model.interface("IBox").is_some());

        let err = parse_events(
            vec![
                TagEvent::open("idl", &[]),
                TagEvent::open("library", &[]),
                TagEvent::open("interface", &[("name", "IBox"), ("extends", "IMissing")]),
            ],
            &CompilerOptions::default(),
        )
        .unwrap_err();
        // Events carry no document offsets.
        assert!(matches!(err, XidlError::UnknownParent { .. }), "got {:?}", err);
    }

    #[test]
    fn test_push_interface_matches_stream() {
        let options = CompilerOptions::default();
        let mut parser = SchemaParser::new(&options);
        parser.open_tag("idl", Attributes::default()).unwrap();
        parser.open_tag("library", Attributes::default()).unwrap();
        parser.open_tag("interface", [("name", "IBox")].into_iter().collect()).unwrap();
        parser.text("ignored");
        parser.close_tag();
        parser.close_tag();
        parser.close_tag();
        // An unbalanced close is tolerated.
        parser.close_tag();
        let parsed = parser.finish();
        assert_eq!(parsed.model.interfaces.len(), 1);
    }
}
