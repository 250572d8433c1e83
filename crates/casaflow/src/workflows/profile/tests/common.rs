use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::messaging::domain::{AccountRole, Correspondent, UserId};
use crate::workflows::outbound::{
    EmailDispatch, EmailError, EmailSender, Notification, NotifyError, Notifier,
};
use crate::workflows::profile::domain::{
    DocumentId, DocumentStatus, UserProfile, VerificationDocument,
};
use crate::workflows::profile::repository::{
    DocumentRepository, ProfileRepository, RepositoryError,
};
use crate::workflows::profile::service::VerificationService;
use crate::workflows::profile::trust::TrustWeights;

pub(super) fn member(suffix: &str) -> Correspondent {
    Correspondent {
        user_id: UserId(format!("user-{suffix}")),
        display_name: format!("Member {suffix}"),
        email: format!("{suffix}@mail.example"),
        role: AccountRole::Member,
    }
}

pub(super) fn build_service() -> (
    VerificationService<MemoryProfiles, MemoryDocuments, MemoryNotifier, MemoryMailer>,
    Arc<MemoryProfiles>,
    Arc<MemoryDocuments>,
    Arc<MemoryNotifier>,
    Arc<MemoryMailer>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let documents = Arc::new(MemoryDocuments::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = VerificationService::new(
        profiles.clone(),
        documents.clone(),
        notifier.clone(),
        mailer.clone(),
        TrustWeights::default(),
    );
    (service, profiles, documents, notifier, mailer)
}

pub(super) fn seed_profile(profiles: &MemoryProfiles, suffix: &str) -> UserId {
    let profile = UserProfile::new(member(suffix));
    let id = profile.user.user_id.clone();
    profiles.save(profile).expect("seed profile");
    id
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl MemoryProfiles {
    pub(super) fn stored(&self, id: &UserId) -> Option<UserProfile> {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl ProfileRepository for MemoryProfiles {
    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(profile.user.user_id.clone(), profile);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDocuments {
    records: Arc<Mutex<HashMap<DocumentId, VerificationDocument>>>,
}

impl DocumentRepository for MemoryDocuments {
    fn insert(
        &self,
        document: VerificationDocument,
    ) -> Result<VerificationDocument, RepositoryError> {
        let mut guard = self.records.lock().expect("document mutex poisoned");
        if guard.contains_key(&document.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn update(&self, document: VerificationDocument) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("document mutex poisoned");
        guard.insert(document.id.clone(), document);
        Ok(())
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<VerificationDocument>, RepositoryError> {
        let guard = self.records.lock().expect("document mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<VerificationDocument>, RepositoryError> {
        let guard = self.records.lock().expect("document mutex poisoned");
        Ok(guard
            .values()
            .filter(|document| document.status == DocumentStatus::Pending)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn create(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMailer {
    sent: Arc<Mutex<Vec<EmailDispatch>>>,
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<EmailDispatch> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailSender for MemoryMailer {
    fn send(&self, email: EmailDispatch) -> Result<(), EmailError> {
        self.sent.lock().expect("mailer mutex poisoned").push(email);
        Ok(())
    }
}
