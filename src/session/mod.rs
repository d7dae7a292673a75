//! Pre-render session gate for protected pages.
//!
//! The guard decides allow-or-redirect before any page body is produced:
//! cookie presence check, then refresh-token exchange, then identity
//! verification, then an optional role check. Redirects are values, not
//! errors, so no error-handling path can swallow them; everything else
//! fails closed to the login page.

use std::time::Duration;

use reqwest::header::COOKIE;
use tracing::{debug, warn};

use crate::api::auth::{AuthTokens, User};
use crate::api::envelope::ResponseEnvelope;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Outcome of the gate check.
#[derive(Debug, Clone)]
pub enum Gate {
    /// Identity verified; render may proceed.
    Allow(SessionUser),
    /// Send the visitor elsewhere, before any page data is fetched.
    Redirect(String),
}

/// Verified identity handed to the page, with the access token minted during
/// the check so the page can fetch its own data server-side.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub access_token: String,
}

pub struct SessionGuard {
    http: reqwest::Client,
    backend_base: String,
    refresh_cookie: String,
}

impl SessionGuard {
    /// The guard forwards each visitor's own refresh cookie explicitly, so
    /// its client deliberately has no cookie store of its own.
    pub fn new(
        backend_base: impl Into<String>,
        refresh_cookie: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            backend_base: backend_base.into().trim_end_matches('/').to_string(),
            refresh_cookie: refresh_cookie.into(),
        })
    }

    pub fn refresh_cookie_name(&self) -> &str {
        &self.refresh_cookie
    }

    /// Gate for pages that only need an authenticated visitor.
    pub async fn require_user(&self, path: &str, cookie: Option<&str>) -> Gate {
        self.check(path, cookie, None).await
    }

    /// Gate for pages restricted to a role, e.g. `admin`.
    pub async fn require_role(&self, path: &str, cookie: Option<&str>, role: &str) -> Gate {
        self.check(path, cookie, Some(role)).await
    }

    async fn check(&self, path: &str, cookie: Option<&str>, role: Option<&str>) -> Gate {
        // No credential cookie: straight to login, no backend traffic.
        let Some(credential) = cookie.filter(|value| !value.is_empty()) else {
            return login_redirect(path);
        };

        let Some(access_token) = self.mint_access_token(credential).await else {
            return login_redirect(path);
        };

        let Some(user) = self.verify_identity(&access_token).await else {
            return login_redirect(path);
        };

        if let Some(required) = role {
            if user.role.as_deref() != Some(required) {
                debug!(path, required, "authenticated visitor lacks required role");
                return Gate::Redirect(format!("{DASHBOARD_PATH}?error=unauthorized"));
            }
        }

        Gate::Allow(SessionUser { user, access_token })
    }

    /// POST /auth/refresh with the visitor's cookie attached. The cookie
    /// value is forwarded opaquely, never parsed.
    async fn mint_access_token(&self, credential: &str) -> Option<String> {
        let url = format!("{}/auth/refresh", self.backend_base);
        let response = self
            .http
            .post(&url)
            .header(COOKIE, format!("{}={}", self.refresh_cookie, credential))
            .send()
            .await
            .map_err(|err| warn!(error = %err, "refresh call failed during gate check"))
            .ok()?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "refresh rejected during gate check");
            return None;
        }
        let envelope = response.json::<ResponseEnvelope<AuthTokens>>().await.ok()?;
        envelope
            .data
            .filter(|_| envelope.success)
            .map(|tokens| tokens.access_token)
    }

    /// GET /auth/me with the freshly minted access token.
    async fn verify_identity(&self, access_token: &str) -> Option<User> {
        let url = format!("{}/auth/me", self.backend_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| warn!(error = %err, "identity check failed during gate check"))
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let envelope = response.json::<ResponseEnvelope<User>>().await.ok()?;
        envelope.data.filter(|_| envelope.success)
    }
}

fn login_redirect(path: &str) -> Gate {
    Gate::Redirect(format!(
        "{LOGIN_PATH}?redirect={}",
        urlencoding::encode(path)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_encodes_original_path() {
        match login_redirect("/admin/users") {
            Gate::Redirect(location) => {
                assert_eq!(location, "/login?redirect=%2Fadmin%2Fusers");
            }
            Gate::Allow(_) => panic!("expected redirect"),
        }
    }
}
