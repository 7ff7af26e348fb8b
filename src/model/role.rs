use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Role tag as stored in `users.role` and carried in session claims.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, EnumString, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoleName {
    Manager,
    GroupLeader,
    SubGroupLeader,
}

/// A role together with the organizational unit it is bound to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Manager,
    GroupLeader { group_id: i64 },
    SubGroupLeader { sub_group_id: i64 },
}

impl Role {
    /// Rebuilds a role from its stored parts. Combinations where the
    /// assignment does not match the role yield `None`.
    pub fn from_parts(role: &str, group_id: Option<i64>, sub_group_id: Option<i64>) -> Option<Self> {
        match (role.parse::<RoleName>().ok()?, group_id, sub_group_id) {
            (RoleName::Manager, None, None) => Some(Role::Manager),
            (RoleName::GroupLeader, Some(group_id), None) => Some(Role::GroupLeader { group_id }),
            (RoleName::SubGroupLeader, None, Some(sub_group_id)) => {
                Some(Role::SubGroupLeader { sub_group_id })
            }
            _ => None,
        }
    }

    pub fn name(&self) -> RoleName {
        match self {
            Role::Manager => RoleName::Manager,
            Role::GroupLeader { .. } => RoleName::GroupLeader,
            Role::SubGroupLeader { .. } => RoleName::SubGroupLeader,
        }
    }

    pub fn group_id(&self) -> Option<i64> {
        match self {
            Role::GroupLeader { group_id } => Some(*group_id),
            _ => None,
        }
    }

    pub fn sub_group_id(&self) -> Option<i64> {
        match self {
            Role::SubGroupLeader { sub_group_id } => Some(*sub_group_id),
            _ => None,
        }
    }
}
