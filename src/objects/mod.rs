//! Documentable objects.
//!
//! Objects are stored in an arena ([`ObjectTree`]) and read through
//! [`ObjectRef`]. Node kinds are a closed set ([`NodeKind`]); aliases stand
//! for another node reached by path and proxy its data.

pub mod builder;
pub mod node;
pub mod tree;
pub mod view;

pub use builder::{DocstringSpec, NodeSpec};
pub use node::{Docstring, Kind, Node, NodeId, NodeKind, Parameter, ParameterKind};
pub use tree::{ObjectRef, ObjectTree};
pub use view::{member_stub, object_view};
