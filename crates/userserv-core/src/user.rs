//! User record, patch and list-filter types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record
///
/// Missing fields deserialize to their zero value so that validation,
/// not decoding, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Unique user identifier, assigned by the store
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Age in years
    pub age: i64,
}

impl User {
    /// Create a user without an identifier
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Generate a fresh user identifier
pub(crate) fn generate_user_id() -> String {
    Uuid::new_v4().to_string()
}

/// Partial update of a stored user
///
/// `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Identifier of the user to patch
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl UserPatch {
    /// Create an empty patch for a user
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    /// Check if the patch carries no field changes
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

/// Filter for listing users
///
/// An empty name or a zero age bound means "unset". Age `0` therefore
/// cannot be used as a bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Exact, case-insensitive name match
    pub name: String,
    /// Inclusive lower age bound
    pub min_age: i64,
    /// Inclusive upper age bound
    pub max_age: i64,
}

impl ListFilter {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_min_age(mut self, min_age: i64) -> Self {
        self.min_age = min_age;
        self
    }

    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    /// Check whether a user passes every set criterion
    pub fn matches(&self, user: &User) -> bool {
        if !self.name.is_empty() && !eq_fold(&user.name, &self.name) {
            return false;
        }
        if self.min_age != 0 && user.age < self.min_age {
            return false;
        }
        if self.max_age != 0 && user.age > self.max_age {
            return false;
        }
        true
    }
}

/// Case-insensitive comparison, one character at a time
///
/// Round-tripping through the single-character uppercase form puts
/// every member of a case orbit (`Σ`, `σ`, `ς`) on the same lowercase.
fn eq_fold(a: &str, b: &str) -> bool {
    a.chars().flat_map(fold_char).eq(b.chars().flat_map(fold_char))
}

fn fold_char(c: char) -> std::char::ToLowercase {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u.to_lowercase(),
        _ => c.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_id() {
        let a = generate_user_id();
        let b = generate_user_id();
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_deserialize_missing_fields() {
        let user: User = serde_json::from_str(r#"{"name":"Ann"}"#).unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "");
        assert_eq!(user.age, 0);
        assert!(user.id.is_empty());
    }

    #[test]
    fn test_patch_builder() {
        let patch = UserPatch::new("u1").age(40);
        assert_eq!(patch.id, "u1");
        assert_eq!(patch.age, Some(40));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(UserPatch::new("u1").is_empty());
    }

    #[test]
    fn test_filter_unset_matches_everything() {
        let filter = ListFilter::default();
        assert!(filter.matches(&User::new("Ann", "ann@example.com", 30)));
        assert!(filter.matches(&User::new("Bob", "bob@example.com", 1)));
    }

    #[test]
    fn test_filter_name_case_insensitive() {
        let filter = ListFilter::default().with_name("bob");
        assert!(filter.matches(&User::new("Bob", "bob@example.com", 15)));
        assert!(filter.matches(&User::new("BOB", "bob@example.com", 15)));
        assert!(!filter.matches(&User::new("Bobby", "bob@example.com", 15)));

        let filter = ListFilter::default().with_name("ÉMILE");
        assert!(filter.matches(&User::new("émile", "e@example.com", 20)));
    }

    #[test]
    fn test_filter_name_folds_final_sigma() {
        let filter = ListFilter::default().with_name("ΟΔΟΣ");
        assert!(filter.matches(&User::new("οδοσ", "x@y", 20)));
        assert!(filter.matches(&User::new("οδος", "x@y", 20)));

        let filter = ListFilter::default().with_name("οδος");
        assert!(filter.matches(&User::new("ΟΔΟΣ", "x@y", 20)));
        assert!(!filter.matches(&User::new("οδοι", "x@y", 20)));
    }

    #[test]
    fn test_filter_age_bounds_inclusive() {
        let filter = ListFilter::default().with_min_age(18).with_max_age(30);
        assert!(filter.matches(&User::new("a", "a@x", 18)));
        assert!(filter.matches(&User::new("a", "a@x", 30)));
        assert!(!filter.matches(&User::new("a", "a@x", 17)));
        assert!(!filter.matches(&User::new("a", "a@x", 31)));
    }
}
