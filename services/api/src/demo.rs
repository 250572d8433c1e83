use crate::infra::{
    default_moderation_config, default_trust_weights, dispatch_policy, InMemoryDocumentRepository,
    InMemoryMailer, InMemoryMessageRepository, InMemoryNotifier, InMemoryProfileRepository,
};
use casaflow::config::AdminConfig;
use casaflow::error::AppError;
use casaflow::workflows::messaging::{
    AccountRole, Correspondent, MessageId, MessageStatus, MessageSubmission, MessagingService,
    ModerationEngine, ReviewVerdict, UserId,
};
use casaflow::workflows::profile::{DocumentKind, DocumentVerdict, VerificationService};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ModerateArgs {
    /// Message subject to classify
    #[arg(long, default_value = "")]
    pub(crate) subject: String,
    /// Message content to classify
    #[arg(long)]
    pub(crate) content: String,
    /// Treat the message as a reply inside an existing member thread
    #[arg(long)]
    pub(crate) reply: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the verification and trust portion of the demo
    #[arg(long)]
    pub(crate) skip_verification: bool,
}

fn member(suffix: &str) -> Correspondent {
    Correspondent {
        user_id: UserId(format!("user-{suffix}")),
        display_name: format!("Member {suffix}"),
        email: format!("{suffix}@mail.example"),
        role: AccountRole::Member,
    }
}

/// One-shot classification without touching storage, for rubric tuning.
pub(crate) fn run_moderate(args: ModerateArgs) -> Result<(), AppError> {
    let ModerateArgs {
        subject,
        content,
        reply,
    } = args;

    let engine = ModerationEngine::new(default_moderation_config());
    let submission = MessageSubmission {
        sender: member("sender"),
        recipient: member("recipient"),
        subject,
        content,
        in_reply_to: reply.then(|| MessageId("msg-000000".to_string())),
    };

    let outcome = engine.classify(&submission);

    println!("Decision:   {}", outcome.decision.summary());
    println!("Spam score: {:.2}", outcome.spam_score);
    for signal in &outcome.signals {
        println!("  +{:.1}  {}", signal.weight, signal.notes);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Casaflow workflow demo");

    let notifier = Arc::new(InMemoryNotifier::default());
    let mailer = Arc::new(InMemoryMailer::default());
    let admin = AdminConfig {
        primary_admin_email: "desk@casaflow.example".to_string(),
    };

    let messaging = MessagingService::new(
        Arc::new(InMemoryMessageRepository::default()),
        notifier.clone(),
        mailer.clone(),
        default_moderation_config(),
        dispatch_policy(&admin),
    );

    println!("\n== Message moderation ==");
    let samples = [
        (
            "Viewing request",
            "Hello, I would love to schedule a viewing of the garden flat this weekend.",
        ),
        (
            "Getting in touch",
            "Call me at 515-555-0123 so we can talk about the lease.",
        ),
        ("Hello", "Win free money now!!! Click here!!!"),
    ];

    let mut held = None;
    for (subject, content) in samples {
        let record = messaging.submit(MessageSubmission {
            sender: member("alice"),
            recipient: member("bob"),
            subject: subject.to_string(),
            content: content.to_string(),
            in_reply_to: None,
        })?;
        println!(
            "  [{}] {:<20} -> {}",
            record.message.status.label(),
            subject,
            record.decision_rationale()
        );
        if record.message.status == MessageStatus::Pending {
            held = Some(record.message.id.clone());
        }
    }

    if let Some(id) = held {
        let reviewed = messaging.review(&id, ReviewVerdict::Approve)?;
        println!(
            "  desk approved {} -> {}",
            reviewed.message.id.0,
            reviewed.message.status.label()
        );
    }

    if !args.skip_verification {
        println!("\n== Verification & trust ==");
        let verification = VerificationService::new(
            Arc::new(InMemoryProfileRepository::default()),
            Arc::new(InMemoryDocumentRepository::default()),
            notifier.clone(),
            mailer.clone(),
            default_trust_weights(),
        );

        let nora = member("nora");
        let user_id = nora.user_id.clone();
        verification.register(nora)?;

        let profile = verification.confirm_email(&user_id)?;
        println!("  email confirmed      -> trust {:.1}", profile.trust_score);
        let profile = verification.confirm_phone(&user_id)?;
        println!("  phone confirmed      -> trust {:.1}", profile.trust_score);
        let profile = verification.accept_terms(&user_id)?;
        println!("  terms accepted       -> trust {:.1}", profile.trust_score);

        for kind in [DocumentKind::Identity, DocumentKind::Financial] {
            let document = verification.submit_document(&user_id, kind)?;
            verification.review_document(&document.id, DocumentVerdict::Approve)?;
            let report = verification.trust_report(&user_id)?;
            println!(
                "  {} approved  -> trust {:.1}",
                kind.label(),
                report.trust_score
            );
        }
    }

    println!("\n== Outbound activity ==");
    for notification in notifier.events() {
        println!(
            "  notify {:<18} [{}] {}",
            notification.user_id.0,
            notification.kind.label(),
            notification.title
        );
    }
    for email in mailer.sent() {
        println!("  email  {:<18} template {}", email.to, email.template);
    }

    Ok(())
}
