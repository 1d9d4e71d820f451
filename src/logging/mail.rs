//! Email-on-error.
//!
//! [`MailLayer`] is a `tracing` layer that hands every event it sees to a
//! [`Mailer`]. Filter it per layer to choose the level. Delivery problems
//! never reach the application: the first failure is printed on stderr,
//! later ones are dropped.

use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::error::AppstrapError;

/// Something that can deliver a message.
pub trait Mailer: Send + Sync {
    fn send(&self, subject: &str, body: &str) -> Result<(), AppstrapError>;
}

pub struct MailLayer {
    mailer: Arc<dyn Mailer>,
    subject: String,
    reported: AtomicBool,
}

impl MailLayer {
    pub fn new(mailer: Arc<dyn Mailer>, subject: impl Into<String>) -> Self {
        Self {
            mailer,
            subject: subject.into(),
            reported: AtomicBool::new(false),
        }
    }

    fn report_failure(&self, err: &AppstrapError) {
        if !self.reported.swap(true, Ordering::SeqCst) {
            eprintln!("appstrap: email logging failed, further failures are not reported: {err}");
        }
    }
}

impl<S: Subscriber> Layer<S> for MailLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let body = format_event(event);
        if let Err(e) = self.mailer.send(&self.subject, &body) {
            self.report_failure(&e);
        }
    }
}

/// `LEVEL target: message key=value ...`
fn format_event(event: &Event<'_>) -> String {
    let meta = event.metadata();
    let mut body = format!("{} {}:", meta.level(), meta.target());
    event.record(&mut BodyVisitor(&mut body));
    if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
        let _ = write!(body, "\n\nat {file}:{line}");
    }
    body
}

struct BodyVisitor<'a>(&'a mut String);

impl Visit for BodyVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, " {value:?}");
        } else {
            let _ = write!(self.0, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            let _ = write!(self.0, " {value}");
        } else {
            let _ = write!(self.0, " {}={value}", field.name());
        }
    }
}

#[cfg(feature = "mail")]
pub use smtp::SmtpMailer;

#[cfg(feature = "mail")]
mod smtp {
    use lettre::message::Mailbox;
    use lettre::message::header::ContentType;
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::{Message, SmtpTransport, Transport};

    use super::Mailer;
    use crate::error::AppstrapError;
    use crate::logging::settings::MailSettings;

    /// Plain SMTP delivery.
    pub struct SmtpMailer {
        transport: SmtpTransport,
        from: Mailbox,
        to: Vec<Mailbox>,
    }

    impl SmtpMailer {
        pub fn from_settings(settings: &MailSettings) -> Result<Self, AppstrapError> {
            let from = settings
                .from
                .as_deref()
                .ok_or_else(|| AppstrapError::Mail("mail.from is not set".into()))
                .and_then(parse_mailbox)?;
            let to = settings
                .recipients()
                .iter()
                .map(|r| parse_mailbox(r))
                .collect::<Result<Vec<_>, _>>()?;
            if to.is_empty() {
                return Err(AppstrapError::Mail("mail.to is not set".into()));
            }

            let mut builder = SmtpTransport::builder_dangerous(&settings.host).port(settings.port);
            if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }

            Ok(Self {
                transport: builder.build(),
                from,
                to,
            })
        }
    }

    fn parse_mailbox(address: &str) -> Result<Mailbox, AppstrapError> {
        address
            .parse()
            .map_err(|e| AppstrapError::Mail(format!("bad address '{address}': {e}")))
    }

    impl Mailer for SmtpMailer {
        fn send(&self, subject: &str, body: &str) -> Result<(), AppstrapError> {
            let mut message = Message::builder()
                .from(self.from.clone())
                .subject(subject)
                .header(ContentType::TEXT_PLAIN);
            for to in &self.to {
                message = message.to(to.clone());
            }
            let message = message
                .body(body.to_string())
                .map_err(|e| AppstrapError::Mail(e.to_string()))?;
            self.transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| AppstrapError::Mail(e.to_string()))
        }
    }
}
