//! In-memory interface model for VirtualBox-style XIDL schemas.
//!
//! The compiler builds a [`Model`] in a single streaming pass over the schema
//! and the emitters only ever read it. Entities are keyed by their declared
//! name and kept in document order.
//!
//! ```
//! use xidlgen_schema::*;
//!
//! let mut model = Model::default();
//! model.push_interface(Interface::new("IShape", None, WsMap::Managed));
//! model.push_interface(Interface::new("IBox", Some("IShape".to_owned()), WsMap::Managed));
//!
//! let boxed = model.interface("IBox").unwrap();
//! assert_eq!(model.parent_of(boxed).map(|p| p.name.as_str()), Some("IShape"));
//! ```

pub mod doc;
pub mod model;

pub use doc::*;
pub use model::*;

/// Parent name used by interfaces that extend an interface outside the schema.
pub const UNKNOWN_PARENT: &str = "$unknown";
/// Parent name used by interfaces that extend the platform error-info interface.
pub const ERRORINFO_PARENT: &str = "$errorinfo";
/// Attribute name the MIDL tool requires on otherwise empty interfaces.
pub const EMPTY_INTERFACE_PLACEHOLDER: &str = "midlDoesNotLikeEmptyInterfaces";

/// Returns `true` for parent names that are accepted without resolution.
pub fn is_sentinel_parent(name: &str) -> bool {
    name == UNKNOWN_PARENT || name == ERRORINFO_PARENT
}
