use crate::ir::Condition;
use crate::ir::FragmentSpread;
use crate::ir::InlineFragment;
use crate::ir::LinkedField;
use crate::ir::ModuleImport;
use crate::ir::ScalarField;
use crate::loc::SourceLocation;
use serde::Serialize;
use std::collections::BTreeSet;

/// One node of the selection tree inside a
/// [`Definition`](crate::ir::Definition).
///
/// Container variants (`LinkedField`, `InlineFragment`, `Condition`,
/// `ModuleImport`) exclusively own their child selections.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Selection {
    Condition(Condition),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
    LinkedField(LinkedField),
    ModuleImport(ModuleImport),
    ScalarField(ScalarField),
}
impl Selection {
    /// Child selections of container variants; empty for leaves.
    pub fn children(&self) -> &[Selection] {
        match self {
            Self::Condition(condition) => condition.selections(),
            Self::InlineFragment(inline) => inline.selections(),
            Self::LinkedField(field) => field.selections(),
            Self::ModuleImport(module) => module.selections(),
            Self::FragmentSpread(_) | Self::ScalarField(_) => &[],
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Condition(condition) => condition.location(),
            Self::FragmentSpread(spread) => spread.location(),
            Self::InlineFragment(inline) => inline.location(),
            Self::LinkedField(field) => field.location(),
            Self::ModuleImport(module) => module.location(),
            Self::ScalarField(field) => field.location(),
        }
    }

    /// A copy of this node with its children replaced. Leaves are returned
    /// unchanged.
    pub(crate) fn with_children(&self, children: Vec<Selection>) -> Selection {
        match self {
            Self::Condition(condition) =>
                Self::Condition(condition.with_selections(children)),
            Self::InlineFragment(inline) =>
                Self::InlineFragment(inline.with_selections(children)),
            Self::LinkedField(field) =>
                Self::LinkedField(field.with_selections(children)),
            Self::ModuleImport(module) =>
                Self::ModuleImport(module.with_selections(children)),
            Self::FragmentSpread(_) | Self::ScalarField(_) => self.clone(),
        }
    }

    /// Serialized form of the node with all location metadata stripped. Two
    /// selections are structurally identical iff their keys are equal.
    pub(crate) fn structural_key(&self) -> String {
        crate::ir::structural_key(self)
    }
}

/// Collects the names of every fragment spread anywhere within `selections`.
pub(crate) fn collect_referenced_fragments(
    selections: &[Selection],
    names: &mut BTreeSet<String>,
) {
    for selection in selections {
        match selection {
            Selection::FragmentSpread(spread) => {
                names.insert(spread.fragment_name.clone());
            },
            // A module import references its fragment through the spread it
            // wraps, until `inline_named_fragments` replaces that spread.
            Selection::Condition(_)
            | Selection::InlineFragment(_)
            | Selection::LinkedField(_)
            | Selection::ModuleImport(_)
            | Selection::ScalarField(_) => {
                collect_referenced_fragments(selection.children(), names);
            },
        }
    }
}

/// Like [`collect_referenced_fragments`], but preserving document order (first
/// occurrence wins).
pub(crate) fn fragment_references_in_order<'a>(
    selections: &'a [Selection],
    names: &mut Vec<&'a str>,
) {
    for selection in selections {
        if let Selection::FragmentSpread(spread) = selection
            && !names.contains(&spread.fragment_name()) {
            names.push(spread.fragment_name());
        }
        fragment_references_in_order(selection.children(), names);
    }
}

/// Location of the first spread (or module import) of `fragment_name`.
pub(crate) fn find_fragment_reference<'a>(
    selections: &'a [Selection],
    fragment_name: &str,
) -> Option<&'a SourceLocation> {
    selections.iter().find_map(|selection| match selection {
        Selection::FragmentSpread(spread) if spread.fragment_name() == fragment_name =>
            Some(spread.location()),
        Selection::ModuleImport(module) if module.fragment_name() == fragment_name =>
            Some(module.location()),
        _ => find_fragment_reference(selection.children(), fragment_name),
    })
}
