//! Member selection and ordering.
//!
//! [`filter_objects`] decides which members of an object are rendered,
//! [`order_members`] decides in which order. Both are exposed to templates
//! as filters of the same names.

pub mod filter;
pub mod order;

pub use filter::{MemberSelection, filter_objects, keep_object};
pub use order::{OrderError, order_members, sort_members};
