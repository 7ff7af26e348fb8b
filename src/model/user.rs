use sqlx::FromRow;

use crate::model::role::Role;

#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub group_id: Option<i64>,
    pub sub_group_id: Option<i64>,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::from_parts(&self.role, self.group_id, self.sub_group_id)
    }
}
