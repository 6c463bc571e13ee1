//! Copy-on-write add/delete of members.
//!
//! Mutations never touch the input tree. The path from the root to the
//! changed member is rebuilt; every other subtree is carried over as is.
//! A miss returns a clone of the input together with a not-found outcome.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::document::{MemberDraft, MemberId, TreeDocument};

/// How a caller addresses a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Id(MemberId),
    /// First match in pre-order wins when names repeat.
    Name(String),
}

impl MemberRef {
    pub fn by_id(id: impl Into<MemberId>) -> Self {
        Self::Id(id.into())
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn matches(&self, member: &TreeDocument) -> bool {
        match self {
            MemberRef::Id(id) => &member.id == id,
            MemberRef::Name(name) => &member.name == name,
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRef::Id(id) => write!(f, "id {}", id),
            MemberRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Parent located; carries the id of the new member.
    Found { member: MemberId },
    ParentNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Member located; carries the removed subtree.
    Found { removed: TreeDocument },
    NotFound,
}

/// Result of a mutation: the tree to continue with, plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<O> {
    pub tree: TreeDocument,
    pub outcome: O,
}

/// Append a new member under the first member matching `parent`.
///
/// The new member gets `rank = parent.rank + 1` and goes last among the
/// parent's children; the parent's `hasChildren` becomes true.
#[instrument(level = "debug", skip(root, draft), fields(member = draft.name()))]
pub fn add_member(
    root: &TreeDocument,
    parent: &MemberRef,
    draft: &MemberDraft,
) -> Mutation<AddOutcome> {
    match attach(root, parent, draft) {
        Some((tree, member)) => {
            debug!("attached {} under {}", member, parent);
            Mutation {
                tree,
                outcome: AddOutcome::Found { member },
            }
        }
        None => Mutation {
            tree: root.clone(),
            outcome: AddOutcome::ParentNotFound,
        },
    }
}

/// Remove the first member matching `member` together with its subtree.
///
/// Only children are inspected, so the root itself can never be removed.
#[instrument(level = "debug", skip(root))]
pub fn delete_member(root: &TreeDocument, member: &MemberRef) -> Mutation<DeleteOutcome> {
    match detach(root, member) {
        Some((tree, removed)) => {
            debug!("detached {} ({} members)", removed.name, removed.iter().count());
            Mutation {
                tree,
                outcome: DeleteOutcome::Found { removed },
            }
        }
        None => Mutation {
            tree: root.clone(),
            outcome: DeleteOutcome::NotFound,
        },
    }
}

fn attach(
    node: &TreeDocument,
    parent: &MemberRef,
    draft: &MemberDraft,
) -> Option<(TreeDocument, MemberId)> {
    if parent.matches(node) {
        // rank equals depth in a valid tree; saturate for unvalidated input
        let child = draft.to_member(node.attributes.rank.saturating_add(1));
        let id = child.id.clone();
        let mut children = node.children.clone();
        children.push(child);
        return Some((rebuild(node, children), id));
    }
    node.children.iter().enumerate().find_map(|(idx, child)| {
        attach(child, parent, draft)
            .map(|(updated, id)| (with_child_replaced(node, idx, updated), id))
    })
}

fn detach(node: &TreeDocument, member: &MemberRef) -> Option<(TreeDocument, TreeDocument)> {
    if let Some(pos) = node.children.iter().position(|c| member.matches(c)) {
        let mut children = node.children.clone();
        let removed = children.remove(pos);
        return Some((rebuild(node, children), removed));
    }
    node.children.iter().enumerate().find_map(|(idx, child)| {
        detach(child, member)
            .map(|(updated, removed)| (with_child_replaced(node, idx, updated), removed))
    })
}

/// Copy `node` with a new child list, re-deriving `hasChildren`.
fn rebuild(node: &TreeDocument, children: Vec<TreeDocument>) -> TreeDocument {
    let mut attributes = node.attributes.clone();
    attributes.has_children = !children.is_empty();
    TreeDocument {
        id: node.id.clone(),
        name: node.name.clone(),
        attributes,
        children,
    }
}

fn with_child_replaced(node: &TreeDocument, idx: usize, replacement: TreeDocument) -> TreeDocument {
    let mut replacement = Some(replacement);
    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            if i == idx {
                if let Some(updated) = replacement.take() {
                    return updated;
                }
            }
            child.clone()
        })
        .collect();
    rebuild(node, children)
}
