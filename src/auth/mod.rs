pub mod error;
pub mod jwt;

pub use jwt::{Claim, decode_jwt, encode_jwt};

pub const ADMIN_ROLE: &str = "admin";

/// The caller behind a verified bearer token.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub uid: String,
    pub role: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

impl From<Claim> for Principal {
    fn from(claim: Claim) -> Self {
        Principal {
            uid: claim.sub,
            role: claim.role,
            name: claim.name,
            picture: claim.picture,
        }
    }
}
