//! Public contact form and the mailer it is handed to.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tracing::info;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("name is required")]
    MissingName,

    #[error("message is required")]
    MissingMessage,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    Mail(#[from] MailError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("mail transport rejected the message: {0}")]
    Rejected(String),

    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingMessage);
        }
        let email = self.email.trim();
        if !EMAIL.is_match(email) {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    /// Validates the form and builds the notification for the office inbox.
    pub fn into_message(
        self,
        from: &str,
        to: &str,
    ) -> Result<MailMessage, ContactError> {
        self.validate()?;
        let name = self.name.trim();
        let phone = match self.phone.trim() {
            "" => "-",
            phone => phone,
        };
        Ok(MailMessage {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Consulta web de {name}"),
            text: format!(
                "Nombre: {name}\nEmail: {}\nTeléfono: {phone}\n\nMensaje:\n{}\n",
                self.email.trim(),
                self.message.trim(),
            ),
        })
    }
}

/// Transactional mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        message: MailMessage,
    ) -> Result<(), MailError>;
}

/// Validates `form` and hands it to `mailer`.
pub async fn send_contact(
    mailer: &dyn Mailer,
    form: ContactForm,
    from: &str,
    to: &str,
) -> Result<(), ContactError> {
    let message = form.into_message(from, to)?;
    let subject = message.subject.clone();
    mailer.send(message).await?;
    info!(%subject, "contact message sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<MailMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(
            &self,
            message: MailMessage,
        ) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    struct DownMailer;

    #[async_trait]
    impl Mailer for DownMailer {
        async fn send(
            &self,
            _message: MailMessage,
        ) -> Result<(), MailError> {
            Err(MailError::Unavailable("timeout".to_string()))
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Lucía Gómez".to_string(),
            email: "lucia@example.com".to_string(),
            phone: String::new(),
            message: "Necesito un presupuesto.".to_string(),
        }
    }

    #[test]
    fn message_lists_fields() {
        let message = form()
            .into_message("web@sincorp.com.ar", "contacto@sincorp.com.ar")
            .unwrap();

        assert_eq!(message.subject, "Consulta web de Lucía Gómez");
        assert_eq!(
            message.text,
            "Nombre: Lucía Gómez\nEmail: lucia@example.com\nTeléfono: -\n\nMensaje:\nNecesito un presupuesto.\n"
        );
        assert_eq!(message.to, "contacto@sincorp.com.ar");
    }

    #[test]
    fn validation_rejects_incomplete_forms() {
        let mut missing_name = form();
        missing_name.name = "  ".to_string();
        let mut missing_message = form();
        missing_message.message.clear();
        let mut bad_email = form();
        bad_email.email = "lucia@".to_string();

        assert_eq!(missing_name.validate(), Err(ContactError::MissingName));
        assert_eq!(missing_message.validate(), Err(ContactError::MissingMessage));
        assert_eq!(
            bad_email.validate(),
            Err(ContactError::InvalidEmail("lucia@".to_string()))
        );
    }

    #[test]
    fn email_pattern_checks_address_shape() {
        for address in ["lucia@example.com", "ventas@sincorp.com.ar", "a.b+c@d.co"] {
            assert!(EMAIL.is_match(address), "{address} should match");
        }
        for address in ["", "lucia", "lucia@", "@example.com", "lucia@example", "lu cia@example.com"] {
            assert!(!EMAIL.is_match(address), "{address} should not match");
        }
    }

    #[tokio::test]
    async fn send_contact_hands_message_to_mailer() {
        let mailer = RecordingMailer::default();

        send_contact(&mailer, form(), "web@sincorp.com.ar", "contacto@sincorp.com.ar")
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "web@sincorp.com.ar");
    }

    #[tokio::test]
    async fn mail_failures_are_reported() {
        let result = send_contact(&DownMailer, form(), "a@b.co", "c@d.co").await;

        assert_eq!(
            result,
            Err(ContactError::Mail(MailError::Unavailable("timeout".to_string())))
        );
    }
}
