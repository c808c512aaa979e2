use chrono::Utc;

use crate::models::account::AdminToken;
use crate::models::settings::SiteSettings;

/// Signed-in admin state passed by reference to everything on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    email: Option<String>,
    token: Option<AdminToken>,
    settings: Option<SiteSettings>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, email: impl Into<String>, token: AdminToken, settings: SiteSettings) {
        self.email = Some(email.into());
        self.token = Some(token);
        self.settings = Some(settings);
    }

    pub fn sign_out(&mut self) {
        self.email = None;
        self.token = None;
        self.settings = None;
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Bearer token, if one is held and has not expired yet.
    pub fn bearer(&self) -> Option<&str> {
        self.token
            .as_ref()
            .filter(|t| t.expires_at > Utc::now().timestamp())
            .map(|t| t.token.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn settings(&self) -> Option<&SiteSettings> {
        self.settings.as_ref()
    }

    pub fn site_name(&self) -> &str {
        self.settings
            .as_ref()
            .map(|s| s.site_name.as_str())
            .unwrap_or("Cozy Condo")
    }
}
