//! Strongly typed identifiers.
//!
//! Membership ids and film ids are both plain integers in the database; the
//! newtypes keep a delete or sort request from being routed by the wrong one.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

id_newtype!(
    /// Primary key of a row in `users`.
    UserId
);

id_newtype!(
    /// Primary key of a row in the shared `films` catalog.
    FilmId
);

id_newtype!(
    /// Primary key of a row in `user_films`. Delete and sort requests address
    /// list entries by this id, never by [`FilmId`].
    MembershipId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_id_conversions() {
        let id = MembershipId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(MembershipId::from(42), id);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = UserId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
