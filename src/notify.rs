//! Outbound "someone pressed a button" notifications.
//!
//! Delivery is best effort: a primary channel (HTTP endpoint) is tried first and
//! a fallback channel (browser notification) second. The outcome is returned as
//! a value so the page can show it; nothing here touches puzzle or gallery state.

use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Hug,
    Valentine,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Hug => "hug",
            NotificationKind::Valentine => "valentine",
            NotificationKind::Other(s) => s,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::Hug => "You got a virtual hug 🤗",
            NotificationKind::Valentine => "Valentine Answered",
            NotificationKind::Other(_) => "Notification",
        }
    }

    pub fn default_body(&self) -> &'static str {
        match self {
            NotificationKind::Hug => "Someone sent you a virtual hug!",
            _ => "They said YES to your Valentine question!",
        }
    }
}

/// Wire payload POSTed to the endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
    pub timestamp: String,
}

impl Notification {
    /// `message` overrides the kind's default body; `timestamp` is ISO-8601.
    pub fn new(kind: &NotificationKind, message: Option<&str>, timestamp: impl Into<String>) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            title: kind.title().to_string(),
            body: message.unwrap_or(kind.default_body()).to_string(),
            timestamp: timestamp.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, NotifyError> {
        serde_json::to_string(self).map_err(|e| NotifyError::Encode(e.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Endpoint,
    Browser,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("no notification endpoint configured")]
    NotConfigured,
    #[error("could not encode notification: {0}")]
    Encode(String),
    #[error("network request failed: {0}")]
    Network(String),
    #[error("notifications are not supported")]
    Unsupported,
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("notification failed: {0}")]
    Browser(String),
    #[error("not delivered ({endpoint}; {browser})")]
    Undelivered {
        endpoint: Box<NotifyError>,
        browser: Box<NotifyError>,
    },
}

/// A way of getting a notification to its recipient.
#[allow(async_fn_in_trait)]
pub trait Channel {
    fn route(&self) -> Route;
    async fn deliver(&self, note: &Notification) -> Result<(), NotifyError>;
}

/// Try `primary`, then `fallback`. Never panics and never touches page state;
/// the caller decides what to show.
pub async fn send_best_effort<P: Channel, F: Channel>(
    primary: &P,
    fallback: &F,
    note: &Notification,
) -> Result<Route, NotifyError> {
    let first = match primary.deliver(note).await {
        Ok(()) => return Ok(primary.route()),
        Err(e) => e,
    };
    match fallback.deliver(note).await {
        Ok(()) => Ok(fallback.route()),
        Err(second) => Err(NotifyError::Undelivered {
            endpoint: Box::new(first),
            browser: Box::new(second),
        }),
    }
}

/// Browser notification permission as seen by the fallback channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

/// What the fallback channel should do given the current permission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStep {
    Show,
    Ask,
    GiveUp,
}

impl Permission {
    pub fn next_step(self) -> PermissionStep {
        match self {
            Permission::Granted => PermissionStep::Show,
            Permission::Default => PermissionStep::Ask,
            Permission::Denied => PermissionStep::GiveUp,
        }
    }
}
