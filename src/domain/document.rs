//! Family tree document: members, attributes and structural invariants
//!
//! A `TreeDocument` is one family member together with all descendants.
//! The serialized shape (`name`, `attributes`, `children`) is the format kept
//! in local storage; `id` was added later. Documents that predate it load
//! with unassigned ids, which [`TreeDocument::assign_missing_ids`] fills in.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Name of the root member of a freshly created tree.
pub const DEFAULT_ROOT_NAME: &str = "Root Family";

/// Rank of the root member.
pub const ROOT_RANK: u32 = 1;

/// Stable identity of a member, independent of its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Placeholder for a member read from storage without an id.
    pub(crate) fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wealth level of a member, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Wealth(u8);

impl Wealth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, DomainError> {
        Self::try_from(i64::from(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Wealth {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for Wealth {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DomainError::WealthOutOfRange(value))
        }
    }
}

impl From<Wealth> for u8 {
    fn from(value: Wealth) -> Self {
        value.0
    }
}

impl fmt::Display for Wealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-member attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// Birth date as `YYYY-MM-DD`, empty when unknown
    #[serde(default)]
    pub birth: String,
    #[serde(default)]
    pub married: bool,
    /// Derived: true iff the member has at least one child
    #[serde(default)]
    pub has_children: bool,
    /// Spouse name, empty when none
    #[serde(default)]
    pub spouse: String,
    /// Generation number, root = 1
    pub rank: u32,
    #[serde(default)]
    pub wealth: Wealth,
}

/// One family member and all descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default = "MemberId::unassigned")]
    pub id: MemberId,
    pub name: String,
    pub attributes: Attributes,
    /// Children in display order
    #[serde(default)]
    pub children: Vec<TreeDocument>,
}

impl Default for TreeDocument {
    /// Single-node tree used when nothing usable is stored.
    fn default() -> Self {
        Self::root(DEFAULT_ROOT_NAME, Wealth::default())
    }
}

impl TreeDocument {
    /// Create a childless root member.
    pub fn root(name: impl Into<String>, wealth: Wealth) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            attributes: Attributes {
                birth: String::new(),
                married: false,
                has_children: false,
                spouse: String::new(),
                rank: ROOT_RANK,
                wealth,
            },
            children: Vec::new(),
        }
    }

    /// Give every member stored without an id a fresh one.
    ///
    /// Returns how many ids were assigned; zero means nothing changed.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        if self.id.is_unassigned() {
            self.id = MemberId::generate();
            assigned += 1;
        }
        for child in &mut self.children {
            assigned += child.assign_missing_ids();
        }
        assigned
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal: a member is yielded before its descendants,
    /// children left to right.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a TreeDocument>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeDocument;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

/// Input for a new member. Rank and parent link are never supplied here;
/// they follow from where the member is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    name: String,
    birth: String,
    married: bool,
    has_children: bool,
    spouse: String,
    wealth: Wealth,
}

impl MemberDraft {
    /// Start a draft with the form defaults (unmarried, no spouse, wealth 3).
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self {
            name,
            birth: String::new(),
            married: false,
            has_children: false,
            spouse: String::new(),
            wealth: Wealth::default(),
        })
    }

    /// Set the birth date; empty clears it.
    pub fn birth(mut self, birth: impl Into<String>) -> Result<Self, DomainError> {
        let birth = birth.into().trim().to_string();
        if !birth.is_empty() && NaiveDate::parse_from_str(&birth, "%Y-%m-%d").is_err() {
            return Err(DomainError::InvalidBirthDate { value: birth });
        }
        self.birth = birth;
        Ok(self)
    }

    pub fn married(mut self, married: bool) -> Self {
        self.married = married;
        self
    }

    /// Form flag only. The stored `hasChildren` is always derived from the
    /// member's actual children.
    pub fn has_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn spouse(mut self, spouse: impl Into<String>) -> Self {
        self.spouse = spouse.into().trim().to_string();
        self
    }

    pub fn wealth(mut self, wealth: Wealth) -> Self {
        self.wealth = wealth;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn claims_children(&self) -> bool {
        self.has_children
    }

    pub(crate) fn to_member(&self, rank: u32) -> TreeDocument {
        TreeDocument {
            id: MemberId::generate(),
            name: self.name.clone(),
            attributes: Attributes {
                birth: self.birth.clone(),
                married: self.married,
                has_children: false,
                spouse: self.spouse.clone(),
                rank,
                wealth: self.wealth,
            },
            children: Vec::new(),
        }
    }
}

/// A broken structural invariant, located by member name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    EmptyName { id: MemberId },
    RootRank { actual: u32 },
    RankMismatch { member: String, expected: u32, actual: u32 },
    RankOverflow { member: String },
    HasChildrenMismatch { member: String, flag: bool },
    DuplicateId { id: MemberId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptyName { id } => write!(f, "member {} has an empty name", id),
            Violation::RootRank { actual } => {
                write!(f, "root rank must be {}, got {}", ROOT_RANK, actual)
            }
            Violation::RankMismatch {
                member,
                expected,
                actual,
            } => write!(
                f,
                "{}: rank {} does not follow its parent (expected {})",
                member, actual, expected
            ),
            Violation::RankOverflow { member } => {
                write!(f, "{}: parent rank leaves no room for a child generation", member)
            }
            Violation::HasChildrenMismatch { member, flag } => {
                write!(f, "{}: hasChildren is {} but children disagree", member, flag)
            }
            Violation::DuplicateId { id } => write!(f, "id {} is used more than once", id),
        }
    }
}

/// Check all structural invariants; empty result means the tree is valid.
pub fn validate(root: &TreeDocument) -> Vec<Violation> {
    let mut violations = Vec::new();
    if root.attributes.rank != ROOT_RANK {
        violations.push(Violation::RootRank {
            actual: root.attributes.rank,
        });
    }
    check_member(root, None, &mut violations);

    let mut seen = std::collections::HashSet::new();
    for member in root.iter() {
        if !seen.insert(&member.id) {
            violations.push(Violation::DuplicateId {
                id: member.id.clone(),
            });
        }
    }
    violations
}

pub fn is_valid(root: &TreeDocument) -> bool {
    validate(root).is_empty()
}

fn check_member(member: &TreeDocument, parent_rank: Option<u32>, out: &mut Vec<Violation>) {
    if member.name.trim().is_empty() {
        out.push(Violation::EmptyName {
            id: member.id.clone(),
        });
    }
    if let Some(parent_rank) = parent_rank {
        match parent_rank.checked_add(1) {
            Some(expected) if member.attributes.rank != expected => {
                out.push(Violation::RankMismatch {
                    member: member.name.clone(),
                    expected,
                    actual: member.attributes.rank,
                });
            }
            Some(_) => {}
            None => out.push(Violation::RankOverflow {
                member: member.name.clone(),
            }),
        }
    }
    if member.attributes.has_children == member.children.is_empty() {
        out.push(Violation::HasChildrenMismatch {
            member: member.name.clone(),
            flag: member.attributes.has_children,
        });
    }
    for child in &member.children {
        check_member(child, Some(member.attributes.rank), out);
    }
}
