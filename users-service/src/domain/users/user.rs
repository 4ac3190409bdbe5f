use super::role::{Role, RoleName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Ordered by role id.
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_any_role(&self, wanted: &[RoleName]) -> bool {
        self.roles.iter().any(|r| wanted.contains(&r.name))
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.to_string()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}
