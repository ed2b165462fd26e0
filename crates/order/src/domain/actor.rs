use serde::{Deserialize, Serialize};
use shared::{config::Claims, errors::ServiceError};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Worker,
    Admin,
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "worker" => Ok(Role::Worker),
            "admin" => Ok(Role::Admin),
            other => Err(ServiceError::Unauthenticated(format!(
                "unknown role '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn buyer(id: Uuid) -> Self {
        Self::new(id, Role::Buyer)
    }

    pub fn worker(id: Uuid) -> Self {
        Self::new(id, Role::Worker)
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn require(&self, role: Role) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "operation requires the {role:?} role"
            )))
        }
    }
}

impl TryFrom<Claims> for Actor {
    type Error = ServiceError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Actor::new(claims.sub, claims.role.parse()?))
    }
}
