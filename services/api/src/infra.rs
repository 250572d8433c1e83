use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use casaflow::config::AdminConfig;
use casaflow::workflows::messaging::{
    AccountRole, Correspondent, DispatchPolicy, MessageId, MessageRecord, MessageRepository,
    MessageStatus, ModerationConfig, RepositoryError, UserId,
};
use casaflow::workflows::outbound::{
    EmailDispatch, EmailError, EmailSender, Notification, NotifyError, Notifier,
};
use casaflow::workflows::profile::{
    DocumentId, DocumentRepository, DocumentStatus, ProfileRepository,
    RepositoryError as ProfileRepositoryError, TrustWeights, UserProfile, VerificationDocument,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMessageRepository {
    records: Arc<Mutex<HashMap<MessageId, MessageRecord>>>,
}

impl MessageRepository for InMemoryMessageRepository {
    fn insert(&self, record: MessageRecord) -> Result<MessageRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.message.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.message.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: MessageRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.message.id) {
            guard.insert(record.message.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &MessageId) -> Result<Option<MessageRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn queue(&self, limit: usize) -> Result<Vec<MessageRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.message.status == MessageStatus::Pending)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, profile: UserProfile) -> Result<(), ProfileRepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(profile.user.user_id.clone(), profile);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentRepository {
    records: Arc<Mutex<HashMap<DocumentId, VerificationDocument>>>,
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn insert(
        &self,
        document: VerificationDocument,
    ) -> Result<VerificationDocument, ProfileRepositoryError> {
        let mut guard = self.records.lock().expect("document mutex poisoned");
        if guard.contains_key(&document.id) {
            return Err(ProfileRepositoryError::Conflict);
        }
        guard.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn update(&self, document: VerificationDocument) -> Result<(), ProfileRepositoryError> {
        let mut guard = self.records.lock().expect("document mutex poisoned");
        if guard.contains_key(&document.id) {
            guard.insert(document.id.clone(), document);
            Ok(())
        } else {
            Err(ProfileRepositoryError::NotFound)
        }
    }

    fn fetch(
        &self,
        id: &DocumentId,
    ) -> Result<Option<VerificationDocument>, ProfileRepositoryError> {
        let guard = self.records.lock().expect("document mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<VerificationDocument>, ProfileRepositoryError> {
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
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for InMemoryNotifier {
    fn create(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Mail adapter for the in-memory service iteration: deliveries are logged
/// and retained so the demo can render them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMailer {
    sent: Arc<Mutex<Vec<EmailDispatch>>>,
}

impl InMemoryMailer {
    pub(crate) fn sent(&self) -> Vec<EmailDispatch> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailSender for InMemoryMailer {
    fn send(&self, email: EmailDispatch) -> Result<(), EmailError> {
        tracing::info!(to = %email.to, template = %email.template, "email queued");
        self.sent.lock().expect("mailer mutex poisoned").push(email);
        Ok(())
    }
}

pub(crate) fn default_moderation_config() -> ModerationConfig {
    ModerationConfig::default()
}

pub(crate) fn default_trust_weights() -> TrustWeights {
    TrustWeights::default()
}

pub(crate) fn dispatch_policy(admin: &AdminConfig) -> DispatchPolicy {
    DispatchPolicy {
        admins: vec![Correspondent {
            user_id: UserId("staff-moderation".to_string()),
            display_name: "Moderation Desk".to_string(),
            email: admin.primary_admin_email.clone(),
            role: AccountRole::Staff,
        }],
        primary_admin_email: admin.primary_admin_email.clone(),
    }
}
