//! Utilities to track the updates of a coordinator

use std::fmt::{Display, Error, Formatter};

/// An event that happens during the life of a coordinator
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateEvent {
    /// No update has been attempted yet
    NotStarted,
    /// An update has just started
    Started,
    /// An update succeeded, and fetched this many tasks
    Updated{ items: usize },
    /// An update failed. Previous data (if any) is kept
    Failed{ reason: String },
}

impl Display for UpdateEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            UpdateEvent::NotStarted => write!(f, "Not started"),
            UpdateEvent::Started => write!(f, "Update has started..."),
            UpdateEvent::Updated{items} => write!(f, "Update finished, {} tasks", items),
            UpdateEvent::Failed{reason} => write!(f, "Update failed: {}", reason),
        }
    }
}

impl Default for UpdateEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<UpdateEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<UpdateEvent>;

/// Create a feeback channel, that can be used to retrieve the latest update of a coordinator
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(UpdateEvent::default())
}
