use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

/// Perspective selected on the client. It shapes presentation only and is
/// never used as an authorization decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Driver,
    Merchant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Driver => "driver",
            Role::Merchant => "merchant",
        }
    }

    /// Name used as the sender of chat messages written under this role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Customer => "Client",
            Role::Driver => "Livreur",
            Role::Merchant => "Commerçant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "driver" => Ok(Role::Driver),
            "merchant" => Ok(Role::Merchant),
            other => Err(DomainError::Validation(format!("unknown role {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_lowercase_names() {
        for role in [Role::Customer, Role::Driver, Role::Merchant] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(Role::Driver.to_string(), "driver");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&Role::Merchant).unwrap();
        assert_eq!(json, "\"merchant\"");
    }
}
