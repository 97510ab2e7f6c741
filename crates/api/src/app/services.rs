//! Service wiring: identity provider, issuer, gate, cookie policy.

use std::sync::Arc;

use remitdesk_auth::{CookiePolicy, EdgeGate, IdentityProvider, RouteTable, StaticIdentityTable, TokenIssuer};

use crate::config::ApiConfig;

/// Everything handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub identities: Arc<dyn IdentityProvider>,
    pub issuer: TokenIssuer,
    pub gate: EdgeGate,
    pub cookie_policy: CookiePolicy,
}

impl AppServices {
    /// Production wiring: the stock identity table and the standard route table.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config, Arc::new(StaticIdentityTable::demo()), RouteTable::standard())
    }

    pub fn new(config: &ApiConfig, identities: Arc<dyn IdentityProvider>, routes: RouteTable) -> Self {
        Self {
            identities,
            issuer: TokenIssuer::new(&config.signing_secret),
            gate: EdgeGate::new(routes),
            cookie_policy: CookiePolicy {
                secure: config.secure_cookies,
            },
        }
    }
}
