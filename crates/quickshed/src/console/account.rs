//! Sign-in, sign-up and sign-out.

use super::{Console, ConsoleError};
use crate::gateway::{Credentials, GatewayError, UserDetails};
use crate::session::Route;
use crate::validation::validate_signup;
use tracing::warn;

impl Console {
    /// Signs in with the user or admin login endpoint and stores the tokens.
    pub async fn login(&self, email: &str, password: &str, admin: bool) -> Result<(), ConsoleError> {
        let route = if admin { Route::AdminLogin } else { Route::UserLogin };
        self.enter(&route)?;

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let result = if admin {
            self.api.admin_login(&credentials).await
        } else {
            self.api.login(&credentials).await
        };
        let tokens = self.report(
            result,
            None,
            "Login failed. Please check your credentials.",
        )?;

        self.session().sign_in(&tokens)?;
        self.notifier.success("Signed in");
        Ok(())
    }

    /// Registers a user account. The user signs in separately afterwards.
    pub async fn signup(&self, email: &str, password: &str, confirm: &str) -> Result<(), ConsoleError> {
        self.enter(&Route::UserSignup)?;
        validate_signup(email.trim(), password, confirm).map_err(|e| self.reject(e))?;

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let result = self.api.register(&credentials).await;
        let failure = match &result {
            Err(GatewayError::Status { body, .. }) => signup_failure_message(body),
            _ => "Signup failed".to_string(),
        };
        self.report(result, Some("Registered. Please log in."), &failure)?;
        Ok(())
    }

    /// Forgets the stored tokens, asking the backend to revoke the refresh token first.
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        if let Some(refresh) = self.session().refresh_token()? {
            if self.session().is_authenticated()? {
                if let Err(e) = self.api.logout(&refresh).await {
                    warn!(error = %e, "Backend logout failed; clearing local session anyway");
                }
            }
        }
        self.session().sign_out()?;
        self.notifier.success("Signed out");
        Ok(())
    }

    /// The account behind the stored token.
    pub async fn whoami(&self) -> Result<UserDetails, ConsoleError> {
        self.enter(&Route::UserDashboard)?;
        let result = self.api.current_user().await;
        self.report(result, None, "Failed to fetch user details")
    }

    /// Trades the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<(), ConsoleError> {
        let Some(refresh) = self.session().refresh_token()? else {
            self.notifier.error("No refresh token stored");
            return Err(ConsoleError::Redirect(Route::UserLogin));
        };
        let result = self.api.refresh_access_token(&refresh).await;
        let token = self.report(result, Some("Access token refreshed"), "Failed to refresh session")?;
        self.session().replace_access_token(&token.access)?;
        Ok(())
    }
}

/// Uses the backend's `error` text when it sent one.
fn signup_failure_message(body: &str) -> String {
    serde_json::from_str::<crate::gateway::ApiMessage>(body)
        .ok()
        .and_then(|m| m.error.or(m.message))
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Signup failed".to_string())
}
