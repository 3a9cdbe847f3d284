//! The closed permission flag set.
//!
//! Permissions are independent flags with no hierarchy: `delete` does not
//! imply `view`, and `edit` does not imply anything else. Each flag must be
//! granted explicitly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use coursehub_core::AppError;

/// A single permission flag on a resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read the resource.
    View,
    /// Modify the resource.
    Edit,
    /// Issue invitations and links for the resource.
    Share,
    /// Delete the resource.
    Delete,
}

impl Permission {
    /// Return the permission as its lowercase wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Share => "share",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "share" => Ok(Self::Share),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::validation(format!("Invalid permission: '{s}'"))),
        }
    }
}

/// A validated, non-empty set of permission flags.
///
/// Stored in PostgreSQL as a `permission[]` column and transmitted on the
/// wire as a JSON array of lowercase strings. Construction through
/// [`PermissionSet::new`] enforces non-emptiness; the empty set only arises
/// as the result of evaluating an identity with no grants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Build a validated set from permission flags. Fails on an empty input.
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Result<Self, AppError> {
        let set: BTreeSet<Permission> = permissions.into_iter().collect();
        if set.is_empty() {
            return Err(AppError::validation(
                "Permission set must contain at least one permission",
            ));
        }
        Ok(Self(set))
    }

    /// Parse and validate a set from wire strings.
    pub fn parse(values: &[String]) -> Result<Self, AppError> {
        let permissions = values
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<Permission>, _>>()?;
        Self::new(permissions)
    }

    /// The empty set. Only meaningful as an evaluation result.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether the set contains no permissions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set contains the given flag. No flag implies another.
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Union of this set with another.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// The flags in a stable order, for storage binding.
    pub fn to_vec(&self) -> Vec<Permission> {
        self.0.iter().copied().collect()
    }

    /// Build a set from a stored `permission[]` column value.
    ///
    /// Stored arrays were validated at write time, so emptiness is not
    /// re-checked here.
    pub fn from_stored(values: &[Permission]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl std::fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = self.0.iter().map(|p| p.as_str()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_set() {
        let set =
            PermissionSet::parse(&["view".to_string(), "edit".to_string()]).expect("valid set");
        assert!(set.contains(Permission::View));
        assert!(set.contains(Permission::Edit));
        assert!(!set.contains(Permission::Share));
    }

    #[test]
    fn test_parse_rejects_unknown_permission() {
        let err = PermissionSet::parse(&["admin".to_string()]).unwrap_err();
        assert_eq!(err.kind, coursehub_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = PermissionSet::parse(&[]).unwrap_err();
        assert_eq!(err.kind, coursehub_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_no_permission_implies_another() {
        let set = PermissionSet::new([Permission::Delete, Permission::Edit]).unwrap();
        assert!(!set.contains(Permission::View));
        assert!(!set.contains(Permission::Share));
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = PermissionSet::new([Permission::View, Permission::View]).unwrap();
        assert_eq!(set.to_vec(), vec![Permission::View]);
    }

    #[test]
    fn test_union() {
        let a = PermissionSet::new([Permission::View]).unwrap();
        let b = PermissionSet::new([Permission::Share]).unwrap();
        let merged = a.union(&b);
        assert!(merged.contains(Permission::View));
        assert!(merged.contains(Permission::Share));
        assert_eq!(merged.to_vec().len(), 2);
    }

    #[test]
    fn test_serde_wire_format_is_string_array() {
        let set = PermissionSet::new([Permission::Edit, Permission::View]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["view","edit"]"#);
    }
}
