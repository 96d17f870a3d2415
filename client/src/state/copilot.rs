//! Co-Pilot sidebar state: panel visibility, chat transcript, chat scope.
//!
//! DESIGN
//! ======
//! Kept apart from the app store on purpose: no shared subscribers and no
//! combined updates. Views that need both read both snapshots.
//!
//! The transcript is append-only. Messages are never edited or removed once
//! added, and the transcript is not partitioned by context.

#[cfg(test)]
#[path = "copilot_test.rs"]
mod copilot_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::notify::{SubscriptionId, Subscribers};
use crate::net::types::LeadId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// What the conversation is currently about.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CopilotContext {
    #[default]
    Global,
    Lead {
        id: LeadId,
        label: Option<String>,
    },
    Market {
        region: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CopilotState {
    pub open: bool,
    pub messages: Vec<ChatMessage>,
    pub context: CopilotContext,
}

impl CopilotState {
    #[must_use]
    pub fn message(&self, id: Uuid) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[derive(Debug, Default)]
pub struct CopilotStore {
    state: RefCell<Rc<CopilotState>>,
    subscribers: Subscribers<CopilotState>,
}

impl CopilotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Rc<CopilotState> {
        Rc::clone(&self.state.borrow())
    }

    pub fn subscribe(&self, callback: impl Fn(&CopilotState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn update<R>(&self, mutate: impl FnOnce(&mut CopilotState) -> R) -> R {
        let out = {
            let mut state = self.state.borrow_mut();
            mutate(Rc::make_mut(&mut state))
        };
        let snapshot = self.snapshot();
        self.subscribers.notify(&snapshot);
        out
    }

    pub fn toggle(&self) {
        self.update(|s| s.open = !s.open);
    }

    pub fn set_open(&self, open: bool) {
        self.update(|s| s.open = open);
    }

    /// Append a message stamped with a fresh id and the current UTC time.
    pub fn add_message(&self, role: Role, content: impl Into<String>) -> Uuid {
        let content = content.into();
        self.update(|s| {
            let mut id = Uuid::new_v4();
            while s.message(id).is_some() {
                id = Uuid::new_v4();
            }
            debug!(%id, ?role, len = content.len(), "copilot message appended");
            s.messages.push(ChatMessage { id, role, content, created_at: OffsetDateTime::now_utc() });
            id
        })
    }

    /// Replace the context wholesale.
    pub fn set_context(&self, context: CopilotContext) {
        self.update(|s| s.context = context);
    }

    pub fn clear_context(&self) {
        self.set_context(CopilotContext::Global);
    }
}
