use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Base,
    SelfService,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
            Role::Base => "BASE",
            Role::SelfService => "SELF_SERVICE",
        }
    }

    pub fn is_self_service(&self) -> bool {
        matches!(self, Role::SelfService)
    }

    pub fn can(&self, entity: PermissionEntity, action: PermissionAction) -> bool {
        use PermissionAction::*;
        use PermissionEntity::*;

        match self {
            Role::Owner | Role::Admin => true,
            Role::SelfService => matches!(
                (entity, action),
                (Booking, Read) | (Booking, Create) | (Booking, Update) | (Asset, Read)
            ),
            Role::Base => matches!((entity, action), (Booking, Read) | (Asset, Read)),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Role::Owner),
            "ADMIN" => Ok(Role::Admin),
            "BASE" => Ok(Role::Base),
            "SELF_SERVICE" => Ok(Role::SelfService),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionEntity {
    Booking,
    Asset,
    TeamMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
    Read,
    Create,
    Update,
    Delete,
}

pub fn require_permission(
    role: Role,
    entity: PermissionEntity,
    action: PermissionAction,
) -> Result<(), AuthError> {
    if role.can(entity, action) {
        return Ok(());
    }
    tracing::warn!("Role {} denied {:?} on {:?}", role, action, entity);
    Err(AuthError::Forbidden(format!(
        "You are not allowed to {} {}",
        format!("{:?}", action).to_lowercase(),
        match entity {
            PermissionEntity::Booking => "bookings",
            PermissionEntity::Asset => "assets",
            PermissionEntity::TeamMember => "team members",
        }
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_can_read_bookings() {
        for role in [Role::Owner, Role::Admin, Role::Base, Role::SelfService] {
            assert!(require_permission(role, PermissionEntity::Booking, PermissionAction::Read).is_ok());
        }
    }

    #[test]
    fn self_service_cannot_delete_or_manage_team() {
        assert!(!Role::SelfService.can(PermissionEntity::Booking, PermissionAction::Delete));
        assert!(!Role::SelfService.can(PermissionEntity::TeamMember, PermissionAction::Read));
        assert!(Role::SelfService.can(PermissionEntity::Booking, PermissionAction::Create));
    }

    #[test]
    fn base_is_read_only() {
        let err = require_permission(Role::Base, PermissionEntity::Booking, PermissionAction::Update).unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to update bookings");
    }

    #[test]
    fn parses_roles() {
        assert_eq!("self_service".parse::<Role>(), Ok(Role::SelfService));
        assert_eq!("OWNER".parse::<Role>(), Ok(Role::Owner));
        assert!("GUEST".parse::<Role>().is_err());
    }
}
