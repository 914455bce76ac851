use crate::enums::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity the auth collaborator vouches for, plus the stored role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
}

impl UserProfile {
    /// Assigns the admin role iff `email` matches the configured admin address.
    pub fn with_role_for(user_id: Uuid, email: Option<String>, admin_email: Option<&str>) -> Self {
        let is_admin = match (email.as_deref(), admin_email) {
            (Some(email), Some(admin)) => email.trim().eq_ignore_ascii_case(admin.trim()),
            _ => false,
        };
        Self {
            user_id,
            email,
            role: if is_admin { UserRole::Admin } else { UserRole::User },
        }
    }
}

/// Per-user display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub platform_name: String,
    pub currency: String,
    pub brand_color: String,
    pub educational_enabled: bool,
    pub sample_data: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            platform_name: "Tradebook".to_string(),
            currency: "USD".to_string(),
            brand_color: "#10b981".to_string(),
            educational_enabled: true,
            sample_data: false,
        }
    }
}
