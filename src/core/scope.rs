use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::{ready, Ready};

/// Opaque visibility constraint over one entity class.
///
/// The reporting engine only ever asks "does this id pass" or hands the
/// selector to a repository to render into its query. How the id set was
/// derived from the caller's role is the authorization layer's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeSelector {
    /// No restriction
    All,
    /// Restricted to an explicit id set; an empty set matches nothing
    Ids(HashSet<String>),
}

impl Default for ScopeSelector {
    fn default() -> Self {
        ScopeSelector::All
    }
}

impl ScopeSelector {
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopeSelector::Ids(ids.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, id: &str) -> bool {
        match self {
            ScopeSelector::All => true,
            ScopeSelector::Ids(set) => set.contains(id),
        }
    }

    /// True when the selector can never match anything
    pub fn matches_none(&self) -> bool {
        matches!(self, ScopeSelector::Ids(set) if set.is_empty())
    }

    /// Ids to render into a storage query, or `None` when unrestricted
    pub fn restricted_ids(&self) -> Option<&HashSet<String>> {
        match self {
            ScopeSelector::All => None,
            ScopeSelector::Ids(set) => Some(set),
        }
    }
}

/// Per-request data-visibility descriptor resolved by the authorization
/// layer before a report handler runs.
///
/// Each entity class carries its own selector: loans are keyed by loan id,
/// transactions by the acting party's id, members and groups by their own
/// ids. Savings accounts follow the selector of their owning party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportScope {
    pub loans: ScopeSelector,
    pub transactions: ScopeSelector,
    pub members: ScopeSelector,
    pub groups: ScopeSelector,
}

impl ReportScope {
    /// Scope that sees everything (administrator view)
    pub fn unrestricted() -> Self {
        Self::default()
    }
}

/// Pulls the scope descriptor the authorization middleware stored in
/// request extensions. A request that carries none is unrestricted,
/// matching how absent filters behave upstream.
impl FromRequest for ReportScope {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let scope = req
            .extensions()
            .get::<ReportScope>()
            .cloned()
            .unwrap_or_default();
        ready(Ok(scope))
    }
}
