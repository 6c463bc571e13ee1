//! Domain layer: the family tree document and pure operations on it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod error;
pub mod event;
pub mod mutator;
pub mod query;

pub use document::{
    is_valid, validate, Attributes, MemberDraft, MemberId, TreeDocument, Violation, Wealth,
    DEFAULT_ROOT_NAME, ROOT_RANK,
};
pub use error::DomainError;
pub use event::TreeEvent;
pub use mutator::{add_member, delete_member, AddOutcome, DeleteOutcome, MemberRef, Mutation};
pub use query::{
    average_wealth, count_generations, count_members, family_stats, find, generation_label,
    search, wealth_indicator, FamilyStats,
};
