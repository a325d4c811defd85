//! Screen-level actions of the admin and user consoles.
//!
//! Each action first passes the access gate for its route, then talks to the
//! backend through the gateway and reports its outcome through the notifier.
//! A failed action raises exactly one error notification.
mod account;
mod dashboard;
mod manage;
pub mod render;
mod schedule;

pub use dashboard::AdminSummary;
pub use manage::TeacherProfile;
pub use schedule::ViewRealm;

use crate::config::ClientConfig;
use crate::gateway::{ApiClient, GatewayError};
use crate::notify::Notifier;
use crate::session::{guard_session, GateDecision, Route, Session, SessionError};
use crate::timetable::PageError;
use crate::validation::ValidationError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The gate refused the route; the caller should continue at the given one.
    #[error("Redirected to {0}")]
    Redirect(Route),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Teacher {teacher} is not assigned to subject {subject}")]
    NotQualified { teacher: u64, subject: u64 },
}

impl ConsoleError {
    /// Whether the failure already reached the user as a notification.
    pub fn is_reported(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Gateway(_) | Self::Page(_) | Self::NotQualified { .. } => {
                true
            }
            Self::Redirect(_) | Self::Session(_) => false,
        }
    }
}

/// Entry point for every screen action.
pub struct Console {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    print_delay: Duration,
}

impl Console {
    pub fn new(
        config: &ClientConfig,
        session: Session,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            api: ApiClient::new(config, session)?,
            notifier,
            print_delay: config.print_delay(),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Passes the gate for `route` or returns where to go instead.
    pub fn enter(&self, route: &Route) -> Result<(), ConsoleError> {
        match guard_session(route, self.session())? {
            GateDecision::Proceed => Ok(()),
            GateDecision::Redirect(target) => {
                info!(from = %route, to = %target, "Redirecting");
                Err(ConsoleError::Redirect(target))
            }
        }
    }

    /// Maps a gateway outcome to one notification.
    fn report<T>(
        &self,
        result: Result<T, GatewayError>,
        success: Option<&str>,
        failure: &str,
    ) -> Result<T, ConsoleError> {
        match result {
            Ok(value) => {
                if let Some(message) = success {
                    self.notifier.success(message);
                }
                Ok(value)
            }
            Err(e) => {
                self.notifier.error(failure);
                Err(e.into())
            }
        }
    }

    /// Reports a failed form check.
    fn reject(&self, error: ValidationError) -> ConsoleError {
        self.notifier.error(&error.to_string());
        error.into()
    }
}
