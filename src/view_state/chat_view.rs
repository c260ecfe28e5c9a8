//! Assistant chat page.
//!
//! A failed history load is not a page error: the conversation falls back
//! to the greeting and the failure stays readable through [`ChatPage::error`].

use std::sync::Arc;

use super::page::{advance, identity_missing, PageEvent, PagePhase};
use crate::api::FitnessApi;
use crate::error::{LiftlogError, LiftlogResult};
use crate::models::ChatMessage;
use crate::state::{ChatStore, SessionStore};
use crate::traits::HttpClient;

pub struct ChatPage<C: HttpClient> {
    session: Arc<SessionStore<C>>,
    chat: ChatStore<C>,
    phase: PagePhase,
}

impl<C: HttpClient> ChatPage<C> {
    pub fn new(session: Arc<SessionStore<C>>, api: FitnessApi<C>) -> Self {
        Self {
            session,
            chat: ChatStore::new(api),
            phase: PagePhase::default(),
        }
    }

    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.chat.messages()
    }

    pub fn is_sending(&self) -> bool {
        self.chat.is_sending()
    }

    /// Last history, send or clear failure.
    pub fn error(&self) -> Option<LiftlogError> {
        self.chat.error()
    }

    pub async fn load(&mut self) {
        self.session.ensure_resolved().await;
        self.sync_identity().await;
    }

    pub async fn sync_identity(&mut self) {
        let session = self.session.snapshot();
        let Some(user_id) = session.user.as_ref().map(|u| u.id) else {
            self.chat.set_user(None).await;
            advance(&mut self.phase, identity_missing(&session));
            return;
        };

        if self.chat.user_id() != Some(user_id) {
            advance(&mut self.phase, PageEvent::IdentityResolved);
            self.chat.set_user(Some(user_id)).await;
            advance(&mut self.phase, PageEvent::LoadSucceeded);
        }
    }

    pub async fn refresh(&mut self) {
        if self.session.user().is_none() {
            self.session.retry_failed().await;
            self.sync_identity().await;
            return;
        }
        advance(&mut self.phase, PageEvent::RefreshStarted);
        if self.phase.is_loading() {
            self.chat.load_history().await;
            advance(&mut self.phase, PageEvent::LoadSucceeded);
        }
    }

    pub async fn send(&self, text: &str) -> LiftlogResult<()> {
        self.chat.send(text).await
    }

    /// Start a new conversation.
    pub async fn clear(&self) -> LiftlogResult<()> {
        self.chat.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::chat::WELCOME;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn page(me: MockResponse) -> (ChatPage<MockHttpClient>, MockHttpClient) {
        let mock = MockHttpClient::new();
        mock.set_response(&format!("{}/api/me", BASE), me);
        let api = FitnessApi::new(BASE, mock.clone());
        let session = Arc::new(SessionStore::new(api.clone()));
        (ChatPage::new(session, api), mock)
    }

    #[tokio::test]
    async fn test_signed_out_shows_greeting_only() {
        let (mut page, mock) = page(MockResponse::status(401));
        page.load().await;

        assert!(matches!(page.phase(), PagePhase::NoIdentity));
        assert_eq!(page.messages(), vec![ChatMessage::assistant(WELCOME)]);
        assert_eq!(mock.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_history_is_ready_with_greeting() {
        let (mut page, mock) = page(MockResponse::json(json!({"user": {"id": 8, "username": "cy"}})));
        mock.set_response(&format!("{}/chat/history/8", BASE), MockResponse::status(503));
        page.load().await;

        assert!(page.phase().is_ready());
        assert_eq!(page.messages(), vec![ChatMessage::assistant(WELCOME)]);
        assert!(page.error().is_some());
    }
}
