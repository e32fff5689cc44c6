//! Member ordering.

use std::cmp::Ordering;

use thiserror::Error;

use crate::objects::ObjectRef;
use crate::options::{MembersOption, MembersOrder, OrderMethod};

/// An ordering method that cannot sort the given members.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    #[error("ordering by {0:?} is not supported")]
    Unsupported(OrderMethod),
}

/// Sort key of a single method. `None` keys sort last.
fn compare(method: OrderMethod, left: &ObjectRef<'_>, right: &ObjectRef<'_>) -> Ordering {
    fn last_if_none<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
        match (left, right) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    match method {
        OrderMethod::Alphabetical => {
            let left = Some(left.name()).filter(|name| !name.is_empty());
            let right = Some(right.name()).filter(|name| !name.is_empty());
            last_if_none(left, right)
        }
        OrderMethod::Source => {
            let line = |object: &ObjectRef<'_>| {
                if object.is_alias() {
                    object.alias_lineno()
                } else {
                    object.lineno()
                }
            };
            last_if_none(line(left), line(right))
        }
        OrderMethod::DunderAll => Ordering::Equal,
    }
}

/// Sort members with a single method, returning a new vector.
///
/// # Errors
///
/// [`OrderError::Unsupported`] for `__all__` ordering, which is not available.
pub fn sort_members<'a>(
    members: &[ObjectRef<'a>],
    method: OrderMethod,
) -> Result<Vec<ObjectRef<'a>>, OrderError> {
    if method == OrderMethod::DunderAll {
        return Err(OrderError::Unsupported(method));
    }
    let mut sorted = members.to_vec();
    sorted.sort_by(|left, right| compare(method, left, right));
    Ok(sorted)
}

/// Order members for rendering.
///
/// A non-empty manual list wins: only the listed members are returned, in the
/// list's order. Otherwise each ordering method is tried in turn, falling
/// through unsupported ones; when none applies, the input order is kept.
/// The input is never reordered in place.
#[must_use]
pub fn order_members<'a>(
    members: &[ObjectRef<'a>],
    order: &MembersOrder,
    members_list: Option<&MembersOption>,
) -> Vec<ObjectRef<'a>> {
    if let Some(MembersOption::Names(names)) = members_list {
        if !names.is_empty() {
            return names
                .iter()
                .filter_map(|name| members.iter().find(|member| member.name() == name).copied())
                .collect();
        }
    }

    for method in order.methods() {
        match sort_members(members, method) {
            Ok(sorted) => return sorted,
            Err(error) => tracing::debug!("{error}, trying the next ordering method"),
        }
    }
    members.to_vec()
}
