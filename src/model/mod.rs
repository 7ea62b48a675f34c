//! Typed object model: value kinds, descriptors and the instance tree.

pub mod convert;
pub mod descriptor;
pub mod tree;
pub mod types;

pub use descriptor::{ClassId, CodeInfo, PropertyDescriptor, TypeDescriptor};
pub use tree::{ObjectId, ObjectNode, ObjectTree, Property};
pub use types::{Category, OptionEntry, OptionList, PropertyType, WXPARENT_CANDIDATES};
