use serde::{Deserialize, Serialize};

/// A fixture user handed out by the [`AsyncService`](crate::AsyncService)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Combine two users: the ids are summed (wrapping on overflow) and the
    /// names are joined, in order
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            id: self.id.wrapping_add(other.id),
            name: format!("{}{}", self.name, other.name),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
