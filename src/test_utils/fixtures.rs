//! Object tree fixtures.
//!
//! Short constructors for [`NodeSpec`] records and a few ready-made packages
//! covering inheritance, re-exports and alias cycles.

use crate::objects::{NodeKind, NodeSpec, ObjectTree, Parameter, ParameterKind};

pub fn module(name: &str) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Module {
            exports: None,
            filepath: None,
        },
    )
}

pub fn module_with_exports(name: &str, exports: &[&str]) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Module {
            exports: Some(exports.iter().map(ToString::to_string).collect()),
            filepath: None,
        },
    )
}

pub fn class(name: &str, bases: &[&str]) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Class {
            bases: bases.iter().map(ToString::to_string).collect(),
        },
    )
}

pub fn function(name: &str) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Function {
            parameters: Vec::new(),
            returns: None,
        },
    )
}

/// Function with `(name, annotation, default)` parameters.
pub fn function_with(
    name: &str,
    parameters: &[(&str, Option<&str>, Option<&str>)],
    returns: Option<&str>,
) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Function {
            parameters: parameters
                .iter()
                .map(|(name, annotation, default)| Parameter {
                    name: (*name).to_string(),
                    annotation: annotation.map(ToString::to_string),
                    kind: ParameterKind::PositionalOrKeyword,
                    default: default.map(ToString::to_string),
                })
                .collect(),
            returns: returns.map(ToString::to_string),
        },
    )
}

pub fn attribute(name: &str) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Attribute {
            annotation: None,
            value: None,
        },
    )
}

pub fn alias(name: &str, target_path: &str) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeKind::Alias {
            target_path: target_path.to_string(),
        },
    )
}

/// Build a tree from top-level module specs and attach inherited members.
pub fn tree_of(modules: Vec<NodeSpec>) -> ObjectTree {
    let mut tree = ObjectTree::new();
    let roots: Vec<_> = modules.into_iter().map(|spec| tree.insert_spec(None, spec)).collect();
    for root in roots {
        tree.attach_inherited_members(root);
    }
    tree
}

/// `package.Base` defines `base`; `package.Child(Base)` defines `main`, so
/// `Child` has `main` (direct) and `base` (inherited).
pub fn inheritance_package() -> ObjectTree {
    tree_of(vec![
        module("package")
            .with_docstring("Package.")
            .with_member(
                class("Base", &[])
                    .with_lineno(1)
                    .with_docstring("Base class.")
                    .with_member(function("base").with_lineno(2).with_docstring("Base method.")),
            )
            .with_member(
                class("Child", &["package.Base"])
                    .with_lineno(5)
                    .with_docstring("Child class.")
                    .with_member(function("main").with_lineno(6).with_docstring("Main method.")),
            ),
    ])
}

/// `package.sub` re-exports `package` (alias back to an ancestor) and a
/// regular function.
pub fn cyclic_package() -> ObjectTree {
    tree_of(vec![
        module("package").with_docstring("Package.").with_member(
            module("sub")
                .with_docstring("Sub module.")
                .with_member(alias("package", "package").with_lineno(1))
                .with_member(function("work").with_lineno(3).with_docstring("Work.")),
        ),
    ])
}
