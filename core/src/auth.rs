//! Login, logout and view gating on top of a [`SessionStore`].

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::notify::{Notification, NotificationLevel, Notifier};
use crate::session::SessionStore;
use crate::transport::Transport;
use crate::types::{LoginRequest, LoginResponse};

pub const MSG_LOGGED_IN: &str = "Logged in successfully!";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_SESSION_FAILED: &str = "Could not save session";

/// The views a front end can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Todos,
}

pub struct AuthFlow<T, N, S> {
    client: TodoClient,
    transport: T,
    notifier: N,
    session: S,
}

impl<T, N, S> AuthFlow<T, N, S>
where
    T: Transport,
    N: Notifier,
    S: SessionStore,
{
    pub fn new(client: TodoClient, transport: T, notifier: N, session: S) -> Self {
        Self {
            client,
            transport,
            notifier,
            session,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// An unreadable session store counts as logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.session.get() {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session, treating as logged out");
                false
            }
        }
    }

    /// Where the user actually lands when asking for `requested`.
    pub fn resolve(&self, requested: Route) -> Route {
        match (requested, self.is_authenticated()) {
            (Route::Todos, false) => Route::Login,
            (Route::Login, true) => Route::Todos,
            (route, _) => route,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Route {
        let input = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = match self.send_login(&input).await {
            Ok(LoginResponse { token }) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.emit(NotificationLevel::Error, MSG_INVALID_CREDENTIALS);
                return Route::Login;
            }
        };

        if let Err(e) = self.session.set(&token) {
            tracing::error!(error = %e, "Failed to store session token");
            self.emit(NotificationLevel::Error, MSG_SESSION_FAILED);
            return Route::Login;
        }

        tracing::debug!(email, "Session established");
        tracing::info!("Logged in");
        self.emit(NotificationLevel::Success, MSG_LOGGED_IN);
        Route::Todos
    }

    pub fn logout(&self) -> Route {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to clear session token");
        }
        tracing::info!("Logged out");
        Route::Login
    }

    async fn send_login(&self, input: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = self.client.build_login(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_login(response)
    }

    fn emit(&self, level: NotificationLevel, message: &str) {
        self.notifier.notify(Notification::new(level, message));
    }
}
