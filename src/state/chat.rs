//! Assistant conversation for the signed-in user.
//!
//! The backend stores the history per user id. The conversation is never
//! empty: with no stored history, no user, or a failed load it holds a
//! single greeting, so there is always something to render.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::api::FitnessApi;
use crate::error::{ErrorContext, LiftlogError, LiftlogResult, ValidationError};
use crate::models::chat::{REPLY_FAILED, WELCOME, WELCOME_AGAIN};
use crate::models::ChatMessage;
use crate::traits::HttpClient;

#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub user_id: Option<u64>,
    pub messages: Vec<ChatMessage>,
    /// History request in flight
    pub is_loading: bool,
    /// Waiting on the assistant's reply
    pub is_sending: bool,
    pub error: Option<LiftlogError>,
}

impl Default for ChatSnapshot {
    fn default() -> Self {
        Self {
            user_id: None,
            messages: vec![ChatMessage::assistant(WELCOME)],
            is_loading: false,
            is_sending: false,
            error: None,
        }
    }
}

pub struct ChatStore<C: HttpClient> {
    api: FitnessApi<C>,
    state: RwLock<ChatSnapshot>,
    ticket: AtomicU64,
}

impl<C: HttpClient> ChatStore<C> {
    pub fn new(api: FitnessApi<C>) -> Self {
        Self {
            api,
            state: RwLock::new(ChatSnapshot::default()),
            ticket: AtomicU64::new(0),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ChatSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.snapshot().messages
    }

    pub fn user_id(&self) -> Option<u64> {
        self.snapshot().user_id
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn is_sending(&self) -> bool {
        self.snapshot().is_sending
    }

    pub fn error(&self) -> Option<LiftlogError> {
        self.snapshot().error
    }

    fn context(operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_resource("chat")
    }

    /// Follow the session. A new user loads their history; no user
    /// resets to the greeting without a request.
    pub async fn set_user(&self, user_id: Option<u64>) {
        {
            let mut state = self.write_state();
            if state.user_id == user_id {
                return;
            }
            state.user_id = user_id;
        }
        debug!(?user_id, "chat identity changed");
        self.load_history().await;
    }

    /// Reload the stored conversation for the current user.
    ///
    /// An empty history shows the greeting. A failed load also shows the
    /// greeting and records the error.
    pub async fn load_history(&self) {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(user_id) = self.user_id() else {
            *self.write_state() = ChatSnapshot::default();
            return;
        };

        self.write_state().is_loading = true;
        let result = self.api.chat_history(user_id).await;

        if ticket != self.ticket.load(Ordering::SeqCst) {
            debug!(ticket, "discarding superseded chat history");
            return;
        }

        let mut state = self.write_state();
        state.is_loading = false;
        match result {
            Ok(history) if history.is_empty() => {
                state.messages = vec![ChatMessage::assistant(WELCOME)];
                state.error = None;
            }
            Ok(history) => {
                debug!(user_id, count = history.len(), "chat history loaded");
                state.messages = history;
                state.error = None;
            }
            Err(e) => {
                warn!(user_id, error = %e, "chat history failed, showing the greeting");
                state.messages = vec![ChatMessage::assistant(WELCOME)];
                state.error = Some(e.with_context(Self::context("history")));
            }
        }
    }

    /// Append the user's message, send the whole conversation, and append
    /// the reply.
    ///
    /// Blank text is rejected before anything changes. When the assistant
    /// cannot be reached an apology takes the reply's place and the error
    /// is returned.
    pub async fn send(&self, text: &str) -> LiftlogResult<()> {
        let text = text.trim();
        if let Err(e) = ValidationError::require("message", text) {
            return Err(LiftlogError::from(e).with_context(Self::context("send")));
        }
        let Some(user_id) = self.user_id() else {
            return Err(LiftlogError::Unauthenticated.with_context(Self::context("send")));
        };

        let conversation = {
            let mut state = self.write_state();
            state.messages.push(ChatMessage::user(text));
            state.is_sending = true;
            state.messages.clone()
        };

        let result = self.api.send_chat(user_id, &conversation).await;

        let mut state = self.write_state();
        state.is_sending = false;
        if state.user_id != Some(user_id) {
            debug!(user_id, "dropping reply for a previous user");
            return Ok(());
        }
        match result {
            Ok(reply) => {
                state.messages.push(reply.into());
                state.error = None;
                Ok(())
            }
            Err(e) => {
                state.messages.push(ChatMessage::assistant(REPLY_FAILED));
                let e = e.with_context(Self::context("send"));
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Delete the stored history and start over. On failure the
    /// conversation is left as it was.
    pub async fn clear(&self) -> LiftlogResult<()> {
        let Some(user_id) = self.user_id() else {
            return Err(LiftlogError::Unauthenticated.with_context(Self::context("clear")));
        };

        match self.api.clear_chat(user_id).await {
            Ok(()) => {
                // A history load still in flight would bring the old turns back.
                self.ticket.fetch_add(1, Ordering::SeqCst);
                let mut state = self.write_state();
                state.messages = vec![ChatMessage::assistant(WELCOME_AGAIN)];
                state.is_loading = false;
                state.error = None;
                info!(user_id, "chat history cleared");
                Ok(())
            }
            Err(e) => {
                let e = e.with_context(Self::context("clear"));
                self.write_state().error = Some(e.clone());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::ChatRole;
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "http://api.test";

    fn store() -> (ChatStore<MockHttpClient>, MockHttpClient) {
        let mock = MockHttpClient::new();
        (ChatStore::new(FitnessApi::new(BASE, mock.clone())), mock)
    }

    fn history_url(user_id: u64) -> String {
        format!("{}/chat/history/{}", BASE, user_id)
    }

    #[tokio::test]
    async fn test_no_user_shows_greeting_without_request() {
        let (chat, mock) = store();
        chat.set_user(None).await;

        assert_eq!(chat.messages(), vec![ChatMessage::assistant(WELCOME)]);
        assert!(mock.get_requests().is_empty());
        assert!(chat.send("hello").await.unwrap_err().is_unauthenticated());
    }

    #[tokio::test]
    async fn test_stored_history_replaces_greeting() {
        let (chat, mock) = store();
        mock.set_response(
            &history_url(2),
            MockResponse::json(json!([
                {"role": "user", "content": "Plan my week"},
                {"role": "assistant", "content": "Three full-body days."}
            ])),
        );
        chat.set_user(Some(2)).await;

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_empty_or_failed_history_falls_back_to_greeting() {
        let (chat, mock) = store();
        mock.set_response(&history_url(2), MockResponse::json(json!([])));
        mock.set_response(&history_url(3), MockResponse::status(500));

        chat.set_user(Some(2)).await;
        assert_eq!(chat.messages(), vec![ChatMessage::assistant(WELCOME)]);
        assert!(chat.error().is_none());

        chat.set_user(Some(3)).await;
        assert_eq!(chat.messages(), vec![ChatMessage::assistant(WELCOME)]);
        assert!(chat.error().is_some());
    }

    #[tokio::test]
    async fn test_send_appends_question_then_reply() {
        let (chat, mock) = store();
        mock.set_response(&history_url(2), MockResponse::json(json!([])));
        mock.set_response(
            &format!("{}/chat", BASE),
            MockResponse::json(json!({"role": "assistant", "reply": "Add 2.5 kg."})),
        );
        chat.set_user(Some(2)).await;

        chat.send("  How should I progress?  ").await.unwrap();

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], ChatMessage::user("How should I progress?"));
        assert_eq!(messages[2], ChatMessage::assistant("Add 2.5 kg."));

        let posted = mock
            .get_requests()
            .into_iter()
            .find(|r| r.url.ends_with("/chat"))
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(posted.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["userId"], 2);
    }

    #[tokio::test]
    async fn test_failed_send_shows_apology_and_blank_is_rejected() {
        let (chat, mock) = store();
        mock.set_response(&history_url(2), MockResponse::json(json!([])));
        mock.set_response(&format!("{}/chat", BASE), MockResponse::status(502));
        chat.set_user(Some(2)).await;

        let err = chat.send("hi").await.unwrap_err();
        assert!(matches!(err.inner(), LiftlogError::Server { status: 502, .. }));
        assert_eq!(
            chat.messages().last(),
            Some(&ChatMessage::assistant(REPLY_FAILED))
        );
        assert!(!chat.is_sending());

        let before = mock.get_requests().len();
        let err = chat.send("   ").await.unwrap_err();
        assert!(matches!(err.inner(), LiftlogError::Validation(_)));
        assert_eq!(mock.get_requests().len(), before);
        assert_eq!(chat.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_clear_resets_and_beats_pending_history() {
        let (chat, mock) = store();
        let url = history_url(2);
        mock.push_response(&url, MockResponse::json(json!([])));
        mock.push_response(
            &url,
            MockResponse::json(json!([{"role": "user", "content": "old"}]))
                .delayed(Duration::from_millis(60)),
        );
        mock.push_response(&url, MockResponse::status(204));
        chat.set_user(Some(2)).await;

        tokio::join!(chat.load_history(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            chat.clear().await.unwrap();
        });

        assert_eq!(chat.messages(), vec![ChatMessage::assistant(WELCOME_AGAIN)]);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_conversation() {
        let (chat, mock) = store();
        let url = history_url(2);
        mock.push_response(&url, MockResponse::json(json!([{"role": "user", "content": "keep me"}])));
        mock.push_response(&url, MockResponse::status(500));
        chat.set_user(Some(2)).await;

        assert!(chat.clear().await.is_err());
        assert_eq!(chat.messages(), vec![ChatMessage::user("keep me")]);
        assert!(chat.error().is_some());
    }
}
