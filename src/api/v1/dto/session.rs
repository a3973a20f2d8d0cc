use serde::Serialize;

use crate::services::auth::AuthContext;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,
}

impl From<&AuthContext> for SessionResponse {
    fn from(ctx: &AuthContext) -> Self {
        match ctx.identity() {
            Some(identity) => Self {
                authenticated: true,
                subject: Some(identity.subject.clone()),
                authorities: identity.authorities.clone(),
            },
            None => Self {
                authenticated: false,
                subject: None,
                authorities: Vec::new(),
            },
        }
    }
}
