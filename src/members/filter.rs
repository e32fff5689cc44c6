//! Member selection.
//!
//! Decision procedure, in order: inheritance gate, `members` short-circuits,
//! name filters, docstring presence, cycle suppression. Input order is kept
//! throughout. Selection is total: it never fails, whatever the inputs.

use tracing::trace;

use crate::objects::ObjectRef;
use crate::options::{FilterPattern, Filters, InheritedMembers, MembersOption, ResolvedOptions};

/// Inputs of [`filter_objects`] taken from the resolved options.
#[derive(Debug, Clone, Copy)]
pub struct MemberSelection<'o> {
    pub filters: &'o Filters,
    pub members: Option<&'o MembersOption>,
    pub inherited_members: &'o InheritedMembers,
    pub keep_no_docstrings: bool,
}

impl<'o> MemberSelection<'o> {
    /// Selection configured by a resolved option record.
    #[must_use]
    pub fn from_options(options: &'o ResolvedOptions) -> Self {
        Self {
            filters: &options.filters,
            members: options.members.as_ref(),
            inherited_members: &options.inherited_members,
            keep_no_docstrings: options.keep_no_docstrings(),
        }
    }
}

/// Whether a name passes a list of filters.
///
/// Later matches override earlier ones. With no match at all, the name is
/// rejected when every filter is an inclusion, and kept otherwise (an empty
/// list keeps everything).
#[must_use]
pub fn keep_object(name: &str, filters: &[FilterPattern]) -> bool {
    let mut keep = None;
    for filter in filters {
        if filter.matches(name) {
            keep = Some(!filter.exclude);
        }
    }
    keep.unwrap_or_else(|| {
        let only_inclusions = !filters.is_empty() && filters.iter().all(|filter| !filter.exclude);
        !only_inclusions
    })
}

/// Select the members to render, keeping input order.
#[must_use]
pub fn filter_objects<'a>(
    members: &[ObjectRef<'a>],
    selection: &MemberSelection<'_>,
) -> Vec<ObjectRef<'a>> {
    let (mut objects, inherited_specified): (Vec<ObjectRef<'a>>, bool) =
        match selection.inherited_members {
            InheritedMembers::All(true) => (members.to_vec(), false),
            InheritedMembers::All(false) => {
                (members.iter().copied().filter(|member| !member.inherited()).collect(), false)
            }
            InheritedMembers::Names(names) => (
                members
                    .iter()
                    .copied()
                    .filter(|member| {
                        !member.inherited() || names.iter().any(|name| name == member.name())
                    })
                    .collect(),
                true,
            ),
        };
    let exempt = |member: &ObjectRef<'_>| inherited_specified && member.inherited();

    match selection.members {
        Some(MembersOption::All(true)) => return objects,
        Some(MembersOption::All(false)) => {
            return objects.into_iter().filter(ObjectRef::inherited).collect();
        }
        Some(MembersOption::Names(names)) if names.is_empty() => {
            return objects.into_iter().filter(ObjectRef::inherited).collect();
        }
        Some(MembersOption::Names(names)) => {
            return objects
                .into_iter()
                .filter(|member| names.iter().any(|name| name == member.name()) || exempt(member))
                .collect();
        }
        None => {}
    }

    match selection.filters {
        Filters::Public => objects.retain(ObjectRef::is_public),
        Filters::Patterns(patterns) if !patterns.is_empty() => {
            objects.retain(|member| keep_object(member.name(), patterns) || exempt(member));
        }
        Filters::Patterns(_) => {}
    }

    if !selection.keep_no_docstrings {
        objects.retain(|member| member.has_docstrings() || exempt(member));
    }

    objects.into_iter().filter(|member| !is_cyclic(*member)).collect()
}

/// Whether an alias points back to one of its own ancestors.
///
/// Resolution failures count as "not a cycle".
fn is_cyclic(member: ObjectRef<'_>) -> bool {
    if !member.is_alias() {
        return false;
    }
    let Ok(target) = member.final_target() else {
        return false;
    };
    let Ok(lineage) = member.lineage_paths() else {
        return false;
    };
    let cyclic = lineage.contains(target.path());
    if cyclic {
        trace!("Dropping {}: it points back to its ancestor {}", member.path(), target.path());
    }
    cyclic
}
