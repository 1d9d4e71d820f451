//! Logging setup.
//!
//! Nothing is installed when the crate is loaded. [`LoggingContext::init`]
//! builds a subscriber from [`LoggingSettings`] and makes it the default for
//! the current thread until the context is dropped.
//!
//! Sinks:
//!
//! - console: warnings and errors on stderr, everything else on stdout.
//!   `APPSTRAP_LOG` (an `EnvFilter` directive) replaces the configured level.
//! - file: a [`RotatingFile`], only when `file.path` is set.
//! - mail: a [`MailLayer`] over a [`Mailer`], only when `mail.enabled`.

mod mail;
mod rotate;
mod settings;

use std::io;
use std::sync::{Arc, Mutex};

use tracing::dispatcher::{self, DefaultGuard};
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::error::AppstrapError;

#[cfg(feature = "mail")]
pub use mail::SmtpMailer;
pub use mail::{MailLayer, Mailer};
pub use rotate::RotatingFile;
pub use settings::{
    ConsoleSettings, FileSettings, LOGGING_CONFIG_NAME, LoggingSettings, MailSettings, parse_level,
};

/// Environment variable overriding the console filter.
pub const LOG_ENV: &str = "APPSTRAP_LOG";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// An installed logging setup. Dropping it restores the previous default.
pub struct LoggingContext {
    _guard: DefaultGuard,
    mailer: Option<Arc<dyn Mailer>>,
    mail_subject: String,
}

impl LoggingContext {
    /// Build the sinks `settings` asks for and install them for this thread.
    ///
    /// `mailer` delivers mail when `mail.enabled` is set. Without one, an SMTP
    /// mailer is built from the settings (feature `mail`); if that is not
    /// possible mail logging is skipped with a warning.
    pub fn init(
        settings: &LoggingSettings,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Result<Self, AppstrapError> {
        let mut layers: Vec<BoxedLayer> = Vec::new();
        layers.push(console_layer(settings)?);

        if let Some(path) = &settings.file.path {
            let file = RotatingFile::open(
                path,
                settings.file.max_bytes,
                settings.file.backup_count,
                settings.file.rollover_on_start,
            )
            .map_err(|e| AppstrapError::Logging(format!("{}: {e}", path.display())))?;
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(parse_level(&settings.file.level)?)
                    .boxed(),
            );
        }

        let mut pending_warning = None;
        let mailer = if settings.mail.enabled {
            match mailer.map(Ok).unwrap_or_else(|| default_mailer(settings)) {
                Ok(mailer) => {
                    layers.push(
                        MailLayer::new(mailer.clone(), settings.mail.subject.clone())
                            .with_filter(parse_level(&settings.mail.level)?)
                            .boxed(),
                    );
                    Some(mailer)
                }
                Err(e) => {
                    pending_warning = Some(e);
                    None
                }
            }
        } else {
            mailer
        };

        let dispatch = Dispatch::new(tracing_subscriber::registry().with(layers));
        let guard = dispatcher::set_default(&dispatch);

        if let Some(e) = pending_warning {
            tracing::warn!("email logging disabled: {e}");
        }
        tracing::debug!(
            console = %settings.console.level,
            file = ?settings.file.path,
            mail = settings.mail.enabled,
            "logging initialized"
        );

        Ok(Self {
            _guard: guard,
            mailer,
            mail_subject: settings.mail.subject.clone(),
        })
    }

    /// Send `body` through the configured mailer. `subject` defaults to the
    /// configured one.
    pub fn send_email(&self, body: &str, subject: Option<&str>) -> Result<(), AppstrapError> {
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| AppstrapError::Mail("no mailer configured".into()))?;
        mailer.send(subject.unwrap_or(&self.mail_subject), body)
    }

    /// Tear down the sinks. Same as dropping the context.
    pub fn shutdown(self) {
        tracing::debug!("logging shut down");
    }
}

fn console_layer(settings: &LoggingSettings) -> Result<BoxedLayer, AppstrapError> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive)
            .map_err(|e| AppstrapError::Logging(format!("{LOG_ENV}={directive}: {e}")))?,
        Err(_) => EnvFilter::default().add_directive(parse_level(&settings.console.level)?.into()),
    };
    let writer = io::stderr.with_max_level(Level::WARN).or_else(io::stdout);
    Ok(fmt::layer()
        .with_ansi(settings.console.color)
        .with_writer(writer)
        .with_filter(filter)
        .boxed())
}

#[cfg(feature = "mail")]
fn default_mailer(settings: &LoggingSettings) -> Result<Arc<dyn Mailer>, AppstrapError> {
    Ok(Arc::new(SmtpMailer::from_settings(&settings.mail)?))
}

#[cfg(not(feature = "mail"))]
fn default_mailer(_settings: &LoggingSettings) -> Result<Arc<dyn Mailer>, AppstrapError> {
    Err(AppstrapError::Mail(
        "built without the `mail` feature and no mailer was given".into(),
    ))
}
