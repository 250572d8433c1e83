use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::messaging::domain::{
    AccountRole, Correspondent, MessageId, MessageStatus, MessageSubmission, UserId,
};
use crate::workflows::messaging::repository::{
    MessageRecord, MessageRepository, RepositoryError,
};
use crate::workflows::messaging::service::{DispatchPolicy, MessagingService, ReviewVerdict};
use crate::workflows::messaging::ModerationConfig;
use crate::workflows::outbound::{
    EmailDispatch, EmailError, EmailSender, Notification, NotifyError, Notifier,
};

pub(super) fn member(suffix: &str) -> Correspondent {
    Correspondent {
        user_id: UserId(format!("user-{suffix}")),
        display_name: format!("Member {suffix}"),
        email: format!("{suffix}@mail.example"),
        role: AccountRole::Member,
    }
}

pub(super) fn staff(suffix: &str) -> Correspondent {
    Correspondent {
        user_id: UserId(format!("staff-{suffix}")),
        display_name: format!("Staff {suffix}"),
        email: format!("{suffix}@casaflow.example"),
        role: AccountRole::Staff,
    }
}

pub(super) fn submission() -> MessageSubmission {
    MessageSubmission {
        sender: member("alice"),
        recipient: member("bob"),
        subject: "Question about the Elm Street apartment".to_string(),
        content: "Hello, I am interested in your two bedroom listing. Is it still available next month?"
            .to_string(),
        in_reply_to: None,
    }
}

pub(super) fn spam_submission() -> MessageSubmission {
    MessageSubmission {
        content: "Win free money now!!! Click here!!!".to_string(),
        subject: "Hello".to_string(),
        ..submission()
    }
}

pub(super) fn contact_submission() -> MessageSubmission {
    MessageSubmission {
        content: "Call me at 515-555-0123 to discuss the lease terms.".to_string(),
        ..submission()
    }
}

pub(super) fn short_submission() -> MessageSubmission {
    MessageSubmission {
        content: "Still available?".to_string(),
        ..submission()
    }
}

pub(super) fn reply_submission() -> MessageSubmission {
    MessageSubmission {
        in_reply_to: Some(MessageId("msg-000001".to_string())),
        ..submission()
    }
}

pub(super) fn moderation_config() -> ModerationConfig {
    ModerationConfig::default()
}

pub(super) fn dispatch_policy() -> DispatchPolicy {
    DispatchPolicy {
        admins: vec![staff("ines"), staff("marco")],
        primary_admin_email: "desk@casaflow.example".to_string(),
    }
}

pub(super) fn build_service() -> (
    MessagingService<MemoryMessages, MemoryNotifier, MemoryMailer>,
    Arc<MemoryMessages>,
    Arc<MemoryNotifier>,
    Arc<MemoryMailer>,
) {
    let repository = Arc::new(MemoryMessages::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = MessagingService::new(
        repository.clone(),
        notifier.clone(),
        mailer.clone(),
        moderation_config(),
        dispatch_policy(),
    );
    (service, repository, notifier, mailer)
}

pub(super) fn approve() -> ReviewVerdict {
    ReviewVerdict::Approve
}

pub(super) fn reject(reason: &str) -> ReviewVerdict {
    ReviewVerdict::Reject {
        reason: reason.to_string(),
    }
}

pub(super) fn amend(content: &str) -> ReviewVerdict {
    ReviewVerdict::Amend {
        content: content.to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMessages {
    pub(super) records: Arc<Mutex<HashMap<MessageId, MessageRecord>>>,
}

impl MemoryMessages {
    pub(super) fn stored(&self, id: &MessageId) -> Option<MessageRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl MessageRepository for MemoryMessages {
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
        guard.insert(record.message.id.clone(), record);
        Ok(())
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

/// Notifier that fails for one user, recording everything else.
pub(super) struct SelectiveNotifier {
    fail_for: UserId,
    inner: MemoryNotifier,
}

impl SelectiveNotifier {
    pub(super) fn failing_for(user_id: UserId) -> Self {
        Self {
            fail_for: user_id,
            inner: MemoryNotifier::default(),
        }
    }

    pub(super) fn events(&self) -> Vec<Notification> {
        self.inner.events()
    }
}

impl Notifier for SelectiveNotifier {
    fn create(&self, notification: Notification) -> Result<(), NotifyError> {
        if notification.user_id == self.fail_for {
            return Err(NotifyError::Transport("inbox offline".to_string()));
        }
        self.inner.create(notification)
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

pub(super) struct FailingMailer;

impl EmailSender for FailingMailer {
    fn send(&self, _email: EmailDispatch) -> Result<(), EmailError> {
        Err(EmailError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl MessageRepository for ConflictRepository {
    fn insert(&self, _record: MessageRecord) -> Result<MessageRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: MessageRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &MessageId) -> Result<Option<MessageRecord>, RepositoryError> {
        Ok(None)
    }

    fn queue(&self, _limit: usize) -> Result<Vec<MessageRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl MessageRepository for UnavailableRepository {
    fn insert(&self, _record: MessageRecord) -> Result<MessageRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: MessageRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &MessageId) -> Result<Option<MessageRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn queue(&self, _limit: usize) -> Result<Vec<MessageRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
