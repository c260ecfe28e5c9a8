//! Typed client for the fitness REST backend.
//!
//! One method per endpoint. Every method classifies the outcome the same
//! way: transport failure is [`LiftlogError::Network`], 401 is
//! [`LiftlogError::Unauthenticated`], any other non-2xx is
//! [`LiftlogError::Server`], and a body that does not fit the schema is
//! [`LiftlogError::InvalidResponse`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{LiftlogError, LiftlogResult, NetworkError};
use crate::models::{
    ChatMessage, ChatReply, ChatRequest, Exercise, ExerciseInput, ListEnvelope, LoginRequest, MeResponse, MostUsedExercise,
    ProgressPoint, RegisterRequest, User, Workout, WorkoutDetail, WorkoutInput,
};
use crate::traits::{Headers, HttpClient, Response};

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Serialize)]
struct NewExercise<'a> {
    username: &'a str,
    #[serde(flatten)]
    input: &'a ExerciseInput,
}

#[derive(Serialize)]
struct NewWorkout<'a> {
    #[serde(rename = "usuarioId")]
    user_id: u64,
    #[serde(flatten)]
    input: &'a WorkoutInput,
}

/// Client for the fitness backend.
///
/// Cheap to clone; clones share the underlying HTTP client and therefore
/// its cookie jar.
pub struct FitnessApi<C: HttpClient> {
    base_url: String,
    client: Arc<C>,
}

impl<C: HttpClient> Clone for FitnessApi<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl FitnessApi<ReqwestHttpClient> {
    /// Build a production client from configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            &config.base_url,
            ReqwestHttpClient::with_timeout(config.request_timeout),
        )
    }
}

impl<C: HttpClient> FitnessApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        Self::with_shared_client(base_url, Arc::new(client))
    }

    pub fn with_shared_client(base_url: &str, client: Arc<C>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    async fn send(&self, method: Method, path: &str, body: Option<String>) -> LiftlogResult<Response> {
        let url = self.url(path);
        let headers = Self::json_headers();
        debug!(method = method.as_str(), %url, "request");

        let body = body.unwrap_or_default();
        let result = match method {
            Method::Get => self.client.get(&url, &headers).await,
            Method::Post => self.client.post(&url, &body, &headers).await,
            Method::Patch => self.client.patch(&url, &body, &headers).await,
            Method::Delete => self.client.delete(&url, &headers).await,
        };

        let response = result.map_err(|e| {
            debug!(method = method.as_str(), %url, error = %e, "transport failure");
            LiftlogError::from(NetworkError::from_http(&url, e))
        })?;
        debug!(method = method.as_str(), %url, status = response.status, "response");

        if response.status == 401 {
            return Err(LiftlogError::Unauthenticated);
        }
        if !response.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(LiftlogError::server(response.status, &text));
        }
        Ok(response)
    }

    fn encode<T: Serialize>(path: &str, body: &T) -> LiftlogResult<String> {
        serde_json::to_string(body).map_err(|e| LiftlogError::InvalidResponse {
            endpoint: path.to_string(),
            message: format!("could not encode request: {}", e),
        })
    }

    fn decode<T: DeserializeOwned>(path: &str, response: &Response) -> LiftlogResult<T> {
        response.json::<T>().map_err(|e| LiftlogError::InvalidResponse {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> LiftlogResult<T> {
        let response = self.send(Method::Get, path, None).await?;
        Self::decode(path, &response)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> LiftlogResult<Vec<T>> {
        let envelope: ListEnvelope<T> = self.get_json(path).await?;
        Ok(envelope.into_vec())
    }

    async fn send_json<T: Serialize>(&self, method: Method, path: &str, body: &T) -> LiftlogResult<()> {
        let body = Self::encode(path, body)?;
        self.send(method, path, Some(body)).await.map(|_| ())
    }

    // ---- session -------------------------------------------------------

    /// Resolve the current user from the session cookie.
    ///
    /// `Ok(None)` when the backend answers 401 or reports no user.
    pub async fn me(&self) -> LiftlogResult<Option<User>> {
        match self.get_json::<MeResponse>("/api/me").await {
            Ok(me) => Ok(me.into_user()),
            Err(LiftlogError::Unauthenticated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> LiftlogResult<()> {
        self.send_json(Method::Post, "/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> LiftlogResult<()> {
        self.send_json(Method::Post, "/register", request).await
    }

    pub async fn logout(&self) -> LiftlogResult<()> {
        self.send(Method::Post, "/logout", None).await.map(|_| ())
    }

    // ---- exercises -----------------------------------------------------

    pub async fn list_exercises(&self, username: &str) -> LiftlogResult<Vec<Exercise>> {
        self.get_list(&format!("/exercises/{}", urlencoding::encode(username)))
            .await
    }

    pub async fn create_exercise(&self, username: &str, input: &ExerciseInput) -> LiftlogResult<()> {
        let body = NewExercise { username, input };
        self.send_json(Method::Post, "/exercises/new", &body).await
    }

    pub async fn update_exercise(&self, id: u64, input: &ExerciseInput) -> LiftlogResult<()> {
        self.send_json(Method::Patch, &format!("/exercises/update/{}", id), input)
            .await
    }

    pub async fn delete_exercise(&self, id: u64) -> LiftlogResult<()> {
        self.send(Method::Delete, &format!("/exercises/delete/{}", id), None)
            .await
            .map(|_| ())
    }

    pub async fn exercise_details(&self, id: u64) -> LiftlogResult<Exercise> {
        self.get_json(&format!("/exercises/details/{}", id)).await
    }

    /// Server-side "most used" aggregate for a user.
    pub async fn most_used_exercises(&self, user_id: u64) -> LiftlogResult<Vec<MostUsedExercise>> {
        self.get_list(&format!("/exercises/mostused/{}", user_id)).await
    }

    pub async fn exercise_progress(&self, exercise_id: u64) -> LiftlogResult<Vec<ProgressPoint>> {
        self.get_list(&format!("/exercises/progress/{}", exercise_id))
            .await
    }

    // ---- workouts ------------------------------------------------------

    pub async fn list_workouts(&self, user_id: u64) -> LiftlogResult<Vec<Workout>> {
        self.get_list(&format!("/workouts/{}", user_id)).await
    }

    pub async fn recent_workouts(&self, user_id: u64) -> LiftlogResult<Vec<Workout>> {
        self.get_list(&format!("/recentworkouts/{}", user_id)).await
    }

    pub async fn create_workout(&self, user_id: u64, input: &WorkoutInput) -> LiftlogResult<()> {
        let body = NewWorkout { user_id, input };
        self.send_json(Method::Post, "/workouts/new", &body).await
    }

    pub async fn delete_workout(&self, id: u64) -> LiftlogResult<()> {
        self.send(Method::Delete, &format!("/workouts/delete/{}", id), None)
            .await
            .map(|_| ())
    }

    pub async fn workout_details(&self, id: u64) -> LiftlogResult<WorkoutDetail> {
        self.get_json(&format!("/workouts/details/{}", id)).await
    }

    // ---- chat ----------------------------------------------------------

    /// Stored conversation, oldest first. Empty when nothing was saved.
    pub async fn chat_history(&self, user_id: u64) -> LiftlogResult<Vec<ChatMessage>> {
        self.get_list(&format!("/chat/history/{}", user_id)).await
    }

    /// Send the whole conversation and get the assistant's next turn.
    pub async fn send_chat(&self, user_id: u64, messages: &[ChatMessage]) -> LiftlogResult<ChatReply> {
        let path = "/chat";
        let body = Self::encode(path, &ChatRequest { messages, user_id })?;
        let response = self.send(Method::Post, path, Some(body)).await?;
        Self::decode(path, &response)
    }

    pub async fn clear_chat(&self, user_id: u64) -> LiftlogResult<()> {
        self.send(Method::Delete, &format!("/chat/history/{}", user_id), None)
            .await
            .map(|_| ())
    }
}
