pub mod favorite;
pub mod helpers;
pub mod people;
pub mod planet;
pub mod user;

use std::fmt;

/// The record kinds stored in the catalog, used to name what was missing or
/// duplicated in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Planet,
    Person,
    Favorite,
}

impl EntityKind {
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Planet => "planets",
            EntityKind::Person => "people",
            EntityKind::Favorite => "favorites",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "User",
            EntityKind::Planet => "Planet",
            EntityKind::Person => "Person",
            EntityKind::Favorite => "Favorite",
        };
        f.write_str(name)
    }
}
