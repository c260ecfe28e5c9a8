//! CLI for liftlog.
//!
//! Signs in from the environment, loads one page and prints it:
//!
//! ```ignore
//! use liftlog::cli::{parse_args, run};
//! use liftlog::config::ClientConfig;
//!
//! let command = parse_args(std::env::args())?;
//! run(command, ClientConfig::from_env()).await?;
//! ```

pub mod args;
pub mod render;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::FitnessApi;
use crate::config::ClientConfig;
use crate::state::SessionStore;
use crate::traits::HttpClient;
use crate::view_state::{ChatPage, DashboardPage, ExercisesPage, ProgressPage, WorkoutsPage};

pub const ENV_EMAIL: &str = "LIFTLOG_EMAIL";
pub const ENV_PASSWORD: &str = "LIFTLOG_PASSWORD";

/// Sign-in details gathered from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// `None` without an email. With an email but no password, the
    /// password is prompted for on the terminal.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(email) = non_empty_var(ENV_EMAIL) else {
            return Ok(None);
        };
        let password = match non_empty_var(ENV_PASSWORD) {
            Some(password) => password,
            None => rpassword::prompt_password(format!("Password for {}: ", email))?,
        };
        Ok(Some(Self { email, password }))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Execute `command` against the configured backend and print the result.
pub async fn run(command: CliCommand, config: ClientConfig) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    let credentials = Credentials::from_env()?;
    let api = FitnessApi::from_config(&config);
    let output = run_with(command, &config, api, credentials).await?;
    print!("{}", output);
    Ok(())
}

/// Sign in if credentials are given, load the page `command` names and
/// render it.
pub async fn run_with<C: HttpClient>(
    command: CliCommand,
    config: &ClientConfig,
    api: FitnessApi<C>,
    credentials: Option<Credentials>,
) -> Result<String> {
    let session = Arc::new(SessionStore::new(api.clone()));
    session.ensure_resolved().await;

    if session.user().is_none() {
        if let Some(credentials) = credentials {
            info!(email = %credentials.email, "Signing in");
            session
                .login(&credentials.email, &credentials.password)
                .await
                .map_err(|e| eyre!("Sign-in failed: {}", e.user_message()))?;
        } else {
            debug!("No credentials; continuing signed out");
        }
    }

    let output = match command {
        CliCommand::Version => version_line(),
        CliCommand::Help => USAGE.to_string(),
        CliCommand::Dashboard => {
            let mut page = DashboardPage::new(session.clone(), api);
            page.load().await;
            render::dashboard(
                page.user().as_ref(),
                page.phase(),
                &page.recent_workouts(),
                &page.most_used(),
                &page.totals(),
            )
        }
        CliCommand::Exercises { category, page: n } => {
            let mut page = ExercisesPage::new(session.clone(), api, config.exercises_page_size);
            page.load().await;
            page.set_category(category);
            page.go_to_page(n);
            render::exercises(
                page.phase(),
                category.name(),
                &page.visible(),
                page.page(),
                page.total_pages(),
            )
        }
        CliCommand::Workouts { page: n } => {
            let mut page = WorkoutsPage::new(session.clone(), api, config.workouts_page_size);
            page.load().await;
            page.go_to_page(n);
            render::workouts(page.phase(), &page.visible(), page.page(), page.total_pages())
        }
        CliCommand::Progress { exercise, range } => {
            let mut page = ProgressPage::new(session.clone(), api);
            page.load().await;
            if let Some(id) = exercise {
                page.select_exercise(id)
                    .await
                    .map_err(|e| eyre!(e.user_message()))?;
            }
            page.set_range(range);
            let selected = page
                .selected()
                .and_then(|id| page.exercises().into_iter().find(|e| e.id == id));
            render::progress(
                page.phase(),
                selected.as_ref(),
                page.range(),
                &page.visible_points(chrono::Utc::now()),
            )
        }
        CliCommand::Chat { send, clear } => {
            let mut page = ChatPage::new(session.clone(), api);
            page.load().await;
            if page.phase().is_ready() {
                if clear {
                    page.clear()
                        .await
                        .map_err(|e| eyre!("Could not clear the conversation: {}", e.user_message()))?;
                }
                if let Some(text) = send {
                    // The failure is rendered with the transcript.
                    if let Err(e) = page.send(&text).await {
                        debug!(error = %e, "assistant reply failed");
                    }
                }
            }
            render::chat(page.phase(), &page.messages(), page.error().as_ref())
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::Category;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn signed_out() -> MockHttpClient {
        let mock = MockHttpClient::new();
        mock.set_response(&format!("{}/api/me", BASE), MockResponse::status(401));
        mock
    }

    #[tokio::test]
    async fn test_signed_out_without_credentials_renders_hint() {
        let mock = signed_out();
        let api = FitnessApi::new(BASE, mock.clone());

        let out = run_with(CliCommand::Dashboard, &ClientConfig::default(), api, None)
            .await
            .unwrap();
        assert!(out.contains("Not signed in"));
        assert_eq!(mock.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_sign_in_is_an_error() {
        let mock = signed_out();
        mock.set_response(
            &format!("{}/login", BASE),
            MockResponse::status_json(401, json!({"message": "bad password"})),
        );
        let api = FitnessApi::new(BASE, mock);
        let credentials = Credentials {
            email: "a@b.c".to_string(),
            password: "nope".to_string(),
        };

        let result = run_with(
            CliCommand::Workouts { page: 1 },
            &ClientConfig::default(),
            api,
            Some(credentials),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_chat_command_clears_then_asks() {
        let mock = MockHttpClient::new();
        mock.set_response(
            &format!("{}/api/me", BASE),
            MockResponse::json(json!({"user": {"id": 6, "username": "di"}})),
        );
        let history = format!("{}/chat/history/6", BASE);
        mock.push_response(&history, MockResponse::json(json!([{"role": "user", "content": "old question"}])));
        mock.push_response(&history, MockResponse::status(204));
        mock.set_response(
            &format!("{}/chat", BASE),
            MockResponse::json(json!({"role": "assistant", "reply": "Sleep more."})),
        );
        let api = FitnessApi::new(BASE, mock.clone());

        let out = run_with(
            CliCommand::Chat {
                send: Some("How do I recover?".to_string()),
                clear: true,
            },
            &ClientConfig::default(),
            api,
            None,
        )
        .await
        .unwrap();

        assert!(!out.contains("old question"));
        assert!(out.contains("How do I recover?"));
        assert!(out.contains("Sleep more."));
        let methods: Vec<String> = mock.get_requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["GET", "GET", "DELETE", "POST"]);
    }

    #[tokio::test]
    async fn test_exercises_command_filters_by_category() {
        let mock = MockHttpClient::new();
        mock.set_response(
            &format!("{}/api/me", BASE),
            MockResponse::json(json!({"user": {"id": 1, "username": "ana"}})),
        );
        mock.set_response(
            &format!("{}/exercises/ana", BASE),
            MockResponse::json(json!([
                {"id": 1, "name": "Squat", "category": ["Legs"]},
                {"id": 2, "name": "Bench", "category": ["Chest"]}
            ])),
        );
        let api = FitnessApi::new(BASE, mock);

        let out = run_with(
            CliCommand::Exercises {
                category: Category::Legs,
                page: 1,
            },
            &ClientConfig::default(),
            api,
            None,
        )
        .await
        .unwrap();
        assert!(out.contains("Squat"));
        assert!(!out.contains("Bench"));
    }
}
