//! Rol del nodo dentro del cluster.
//!
//! Toda decisión sobre qué steps entran en un plan pasa por los predicados de
//! `Role`; nadie más compara strings de rol.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Control,
    Compute,
    /// Nodo control + compute.
    Converged,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Control, Role::Compute, Role::Converged];

    pub fn is_control_node(&self) -> bool {
        matches!(self, Role::Control | Role::Converged)
    }

    pub fn is_compute_node(&self) -> bool {
        matches!(self, Role::Compute | Role::Converged)
    }

    /// Nombre en minúsculas, tal como lo acepta la CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Control => "control",
            Role::Compute => "compute",
            Role::Converged => "converged",
        }
    }

    /// Nombre que se registra en el servicio de cluster.
    pub fn cluster_role(&self) -> &'static str {
        match self {
            Role::Control => "CONTROL",
            Role::Compute => "COMPUTE",
            Role::Converged => "CONVERGED",
        }
    }
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL.iter()
                 .copied()
                 .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
                 .ok_or_else(|| EngineError::InvalidRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive() {
        assert_eq!("CONTROL".parse::<Role>().unwrap(), Role::Control);
        assert_eq!("Compute".parse::<Role>().unwrap(), Role::Compute);
        assert_eq!("converged".parse::<Role>().unwrap(), Role::Converged);
    }

    #[test]
    fn control_predicate() {
        assert!(Role::Control.is_control_node());
        assert!(Role::Converged.is_control_node());
        assert!(!Role::Compute.is_control_node());
    }

    #[test]
    fn compute_predicate() {
        assert!(Role::Compute.is_compute_node());
        assert!(Role::Converged.is_compute_node());
        assert!(!Role::Control.is_compute_node());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "storage".parse::<Role>().unwrap_err();
        assert_eq!(err, EngineError::InvalidRole("storage".to_string()));
        assert!(matches!("".parse::<Role>(), Err(EngineError::InvalidRole(_))));
    }

    #[test]
    fn cluster_role_is_upper_case() {
        for r in Role::ALL {
            assert_eq!(r.cluster_role(), r.as_str().to_uppercase());
        }
    }
}
