use serde::Serialize;

use crate::services::identity::Identity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i64,
    pub email: String,
    pub authorities: Vec<String>,
}

impl From<&Identity> for MeResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.subject.clone(),
            authorities: identity.authorities.clone(),
        }
    }
}
