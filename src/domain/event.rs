//! Typed interaction events emitted by a tree view.

use crate::domain::document::MemberDraft;
use crate::domain::mutator::MemberRef;

/// A user request raised from a rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// The add control of `parent` was used and the member form submitted.
    NodeAddRequested { parent: MemberRef, draft: MemberDraft },
    /// The delete control of `member` was used.
    NodeDeleteRequested { member: MemberRef },
}

impl TreeEvent {
    pub fn target(&self) -> &MemberRef {
        match self {
            TreeEvent::NodeAddRequested { parent, .. } => parent,
            TreeEvent::NodeDeleteRequested { member } => member,
        }
    }
}
