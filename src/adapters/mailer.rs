use crate::config::mailer::MailerConfig;
use crate::core::notification::Notification;
use crate::domain::model::ChangeReport;
use crate::domain::ports::Notifier;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|source| MonitorError::Address {
            address: address.to_string(),
            source,
        })
}

/// Builds the outgoing message. Every recipient goes into Bcc, so the sent
/// headers carry no recipient list.
pub fn build_message(
    sender: &str,
    recipients: &[String],
    notification: &Notification,
) -> Result<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_PLAIN);

    for recipient in recipients {
        builder = builder.bcc(parse_mailbox(recipient)?);
    }

    Ok(builder.body(notification.body.clone())?)
}

/// 透過 SMTPS (implicit TLS) 寄出通知
pub struct SmtpNotifier {
    config: MailerConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    include_keywords: bool,
}

impl SmtpNotifier {
    pub fn new(config: MailerConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender_address.clone(),
                config.sender_credential.clone(),
            ))
            .build();

        Ok(Self {
            config,
            transport,
            include_keywords: true,
        })
    }

    pub fn with_keywords(mut self, include_keywords: bool) -> Self {
        self.include_keywords = include_keywords;
        self
    }

    async fn send(&self, recipients: &[String], notification: Notification) -> Result<()> {
        if recipients.is_empty() {
            tracing::warn!(
                "⚠️ No recipients configured, dropping email '{}'",
                notification.subject
            );
            return Ok(());
        }

        let message = build_message(&self.config.sender_address, recipients, &notification)?;
        self.transport.send(message).await?;

        tracing::info!(
            "📧 Sent '{}' to {} recipient(s)",
            notification.subject,
            recipients.len()
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify_unreachable(
        &self,
        recipients: &[String],
        url: &str,
        status_code: u16,
    ) -> Result<()> {
        self.send(recipients, Notification::unreachable(url, status_code))
            .await
    }

    async fn notify_changed(
        &self,
        recipients: &[String],
        url: &str,
        report: &ChangeReport,
    ) -> Result<()> {
        self.send(
            recipients,
            Notification::changed(url, report, self.include_keywords),
        )
        .await
    }
}
