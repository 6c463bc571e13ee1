//! Editing session: the current tree, the admin gate and event dispatch.
//!
//! Each request runs one synchronous cycle: compute the new tree from the
//! current one, save it, then make it current. A failed lookup or a failed
//! save leaves the current tree untouched.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::persistence::{LoadSource, PersistenceAdapter};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    add_member, delete_member, family_stats, AddOutcome, DeleteOutcome, FamilyStats,
    MemberDraft, MemberId, MemberRef, TreeDocument, TreeEvent,
};

/// Shared-secret check that unlocks editing. Plain string equality.
#[derive(Debug, Clone)]
pub struct AdminGate {
    code: String,
}

impl AdminGate {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn verify(&self, input: &str) -> ApplicationResult<()> {
        if input == self.code {
            Ok(())
        } else {
            Err(ApplicationError::InvalidAdminCode)
        }
    }
}

/// What a handled event changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Added { member: MemberId },
    Deleted { removed: TreeDocument },
}

pub struct FamilySession {
    store: Arc<dyn PersistenceAdapter>,
    tree: TreeDocument,
    source: LoadSource,
    admin: bool,
}

impl FamilySession {
    /// Load the stored tree and start a read-only session.
    ///
    /// Ids assigned to a legacy document are saved right away so that they
    /// stay the same across sessions. A failed save is logged, not returned.
    #[instrument(level = "debug", skip(store))]
    pub fn open(store: Arc<dyn PersistenceAdapter>) -> ApplicationResult<Self> {
        let loaded = store.load()?;
        debug!("open: source={:?}", loaded.source);
        if let LoadSource::Migrated { assigned } = loaded.source {
            match store.save(&loaded.tree) {
                Ok(()) => info!("stored {} new member id(s)", assigned),
                Err(e) => warn!("member ids not saved, they will change next time: {}", e),
            }
        }
        Ok(Self {
            store,
            tree: loaded.tree,
            source: loaded.source,
            admin: false,
        })
    }

    pub fn tree(&self) -> &TreeDocument {
        &self.tree
    }

    /// How the tree was obtained at startup.
    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    pub fn stats(&self) -> FamilyStats {
        family_stats(&self.tree)
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn login(&mut self, gate: &AdminGate, code: &str) -> ApplicationResult<()> {
        gate.verify(code)?;
        info!("admin login");
        self.admin = true;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.admin = false;
    }

    /// Apply an interaction event from a tree view.
    pub fn handle(&mut self, event: TreeEvent) -> ApplicationResult<EventOutcome> {
        debug!("handle: target={}", event.target());
        match event {
            TreeEvent::NodeAddRequested { parent, draft } => self
                .add_member(&parent, &draft)
                .map(|member| EventOutcome::Added { member }),
            TreeEvent::NodeDeleteRequested { member } => self
                .delete_member(&member)
                .map(|removed| EventOutcome::Deleted { removed }),
        }
    }

    #[instrument(level = "debug", skip(self, draft), fields(member = draft.name()))]
    pub fn add_member(
        &mut self,
        parent: &MemberRef,
        draft: &MemberDraft,
    ) -> ApplicationResult<MemberId> {
        self.require_admin("add members")?;
        if draft.claims_children() {
            debug!("draft hasChildren ignored, derived from the tree");
        }
        let mutation = add_member(&self.tree, parent, draft);
        match mutation.outcome {
            AddOutcome::Found { member } => {
                self.commit(mutation.tree)?;
                info!("added {} under {}", draft.name(), parent);
                Ok(member)
            }
            AddOutcome::ParentNotFound => Err(ApplicationError::ParentNotFound(parent.to_string())),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_member(&mut self, member: &MemberRef) -> ApplicationResult<TreeDocument> {
        self.require_admin("delete members")?;
        let mutation = delete_member(&self.tree, member);
        match mutation.outcome {
            DeleteOutcome::Found { removed } => {
                self.commit(mutation.tree)?;
                info!("deleted {} ({} members)", member, removed.iter().count());
                Ok(removed)
            }
            DeleteOutcome::NotFound => Err(ApplicationError::MemberNotFound(member.to_string())),
        }
    }

    fn require_admin(&self, action: &str) -> ApplicationResult<()> {
        if self.admin {
            Ok(())
        } else {
            Err(ApplicationError::AdminRequired {
                action: action.to_string(),
            })
        }
    }

    fn commit(&mut self, tree: TreeDocument) -> ApplicationResult<()> {
        self.store.save(&tree)?;
        self.tree = tree;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::persistence::MemoryStore;
    use crate::domain::{count_members, is_valid, Wealth};

    fn admin_session(store: Arc<MemoryStore>) -> FamilySession {
        let mut session = FamilySession::open(store).unwrap();
        session.login(&AdminGate::new("1234"), "1234").unwrap();
        session
    }

    #[test]
    fn given_wrong_code_when_logging_in_then_rejected_and_read_only() {
        let mut session = FamilySession::open(Arc::new(MemoryStore::new())).unwrap();
        let err = session.login(&AdminGate::new("1234"), "0000").unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidAdminCode));
        assert!(!session.is_admin());
    }

    #[test]
    fn given_read_only_session_when_adding_then_admin_required() {
        let mut session = FamilySession::open(Arc::new(MemoryStore::new())).unwrap();
        let err = session
            .add_member(&MemberRef::by_name("Root Family"), &MemberDraft::new("A").unwrap())
            .unwrap_err();
        assert!(matches!(err, ApplicationError::AdminRequired { .. }));
        assert_eq!(count_members(session.tree()), 1);
    }

    #[test]
    fn given_add_event_when_handled_then_saved_and_current() {
        let store = Arc::new(MemoryStore::new());
        let mut session = admin_session(store.clone());
        let draft = MemberDraft::new("Alice")
            .unwrap()
            .wealth(Wealth::new(4).unwrap());

        let outcome = session
            .handle(TreeEvent::NodeAddRequested {
                parent: MemberRef::by_name("Root Family"),
                draft,
            })
            .unwrap();

        assert!(matches!(outcome, EventOutcome::Added { .. }));
        let stats = session.stats();
        assert_eq!(stats.members, 2);
        assert_eq!(stats.average_wealth, 3.5);
        assert!(is_valid(session.tree()));
        assert!(store.raw().unwrap().contains("Alice"));
    }

    #[test]
    fn given_unknown_member_when_deleting_then_not_found_and_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let mut session = admin_session(store.clone());
        let before = session.tree().clone();

        let err = session
            .handle(TreeEvent::NodeDeleteRequested {
                member: MemberRef::by_name("Ghost"),
            })
            .unwrap_err();

        assert!(matches!(err, ApplicationError::MemberNotFound(_)));
        assert_eq!(session.tree(), &before);
        assert!(store.raw().is_none());
    }

    #[test]
    fn given_document_without_ids_when_opening_twice_then_ids_stable() {
        let raw = r#"{"name": "Root Family", "attributes": {"rank": 1, "hasChildren": true},
                      "children": [{"name": "Alice", "attributes": {"rank": 2}}]}"#;
        let store = Arc::new(MemoryStore::with_raw(raw));

        let first = FamilySession::open(store.clone()).unwrap();
        let second = FamilySession::open(store.clone()).unwrap();

        assert_eq!(first.source(), &LoadSource::Migrated { assigned: 2 });
        assert_eq!(second.source(), &LoadSource::Stored);
        assert_eq!(first.tree(), second.tree());
    }

    #[test]
    fn given_logout_when_deleting_then_admin_required() {
        let mut session = admin_session(Arc::new(MemoryStore::new()));
        session.logout();
        let err = session
            .delete_member(&MemberRef::by_name("anyone"))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::AdminRequired { .. }));
    }
}
