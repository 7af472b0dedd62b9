//! Who is using the client, and which pages they may open.

use uuid::Uuid;

use crate::Result;
use crate::source::CompetitionSource;

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing,
    AdminLogin,
    AdminCompetitions,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Listing => "/",
            Self::AdminLogin => "/admin/login",
            Self::AdminCompetitions => "/admin/competitions",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Listing),
            "/admin/login" => Some(Self::AdminLogin),
            "/admin" | "/admin/competitions" => Some(Self::AdminCompetitions),
            _ => None,
        }
    }

    fn requires_admin(&self) -> bool {
        matches!(self, Self::AdminCompetitions)
    }
}

/// Identity resolved once at startup and consulted on every navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    viewer: Option<Uuid>,
    admin_key: Option<String>,
}

impl Session {
    pub fn new(viewer: Option<Uuid>, admin_key: Option<String>) -> Self {
        Self {
            viewer,
            admin_key: admin_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Ask the data store who we are
    pub async fn resolve<S: CompetitionSource + ?Sized>(
        source: &S,
        admin_key: Option<String>,
    ) -> Result<Self> {
        let viewer = source.current_viewer().await?;

        match viewer {
            Some(id) => tracing::debug!(viewer = %id, "Session resolved"),
            None => tracing::debug!("Anonymous session"),
        }

        Ok(Self::new(viewer, admin_key))
    }

    pub fn viewer(&self) -> Option<Uuid> {
        self.viewer
    }

    pub fn is_admin(&self) -> bool {
        self.admin_key.is_some()
    }

    /// The page actually shown when navigating to `route`
    pub fn guard(&self, route: Route) -> Route {
        if route.requires_admin() && !self.is_admin() {
            tracing::debug!(requested = route.path(), "Redirecting to admin login");
            return Route::AdminLogin;
        }
        route
    }
}
