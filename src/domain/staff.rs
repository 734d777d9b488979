use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    /// Anything other than "admin" is staff.
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Staff
        }
    }
}

/// Represents a member of the back-office team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Params for creating a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCreate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

/// Params for updating an existing user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub role: Option<Role>,
}

/// Raw user form input.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
}

impl UserDraft {
    /// `None` when the name is blank.
    pub fn to_create(&self) -> Option<UserCreate> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(UserCreate {
            name: name.to_string(),
            phone: optional(&self.phone),
            email: optional(&self.email),
            role: Role::parse(&self.role),
        })
    }

    pub fn to_patch(&self) -> UserPatch {
        UserPatch {
            name: Some(self.name.clone()),
            phone: Some(optional(&self.phone)),
            email: Some(optional(&self.email)),
            role: Some(Role::parse(&self.role)),
        }
    }
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Case-insensitive search over name, email and phone, sorted by name.
pub fn search_users(users: &[AdminUser], query: &str) -> Vec<AdminUser> {
    let needle = query.to_lowercase();
    let mut list: Vec<AdminUser> = users
        .iter()
        .filter(|u| {
            format!(
                "{} {} {}",
                u.name,
                u.email.as_deref().unwrap_or_default(),
                u.phone.as_deref().unwrap_or_default()
            )
            .to_lowercase()
            .contains(&needle)
        })
        .cloned()
        .collect();
    list.sort_by_key(|u| u.name.to_lowercase());
    list
}
