//! Access model types
//!
//! Users, roles and permissions as edited by the access administration
//! screen. Associations are held by id only; names are resolved against
//! the owning [`Directory`](crate::assignment::Directory) when rendered.

use serde::{Deserialize, Serialize};

/// Numeric identity shared by users, roles and permissions
pub type EntityId = u64;

/// Anything that can be listed in a picker
pub trait Named {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
}

/// Ordered set of associated ids
///
/// Insertion order is the display order. Inserting an id that is already
/// present leaves the set untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EntityId>", into = "Vec<EntityId>")]
pub struct AssociationSet {
    ids: Vec<EntityId>,
}

impl AssociationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id. Returns `false` when it was already associated.
    pub fn insert(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove the association shown at display position `index`.
    ///
    /// The id is read from the position first and then every entry with
    /// that id is filtered out. Returns the removed id, or `None` when the
    /// index is out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<EntityId> {
        let target = *self.ids.get(index)?;
        self.ids.retain(|id| *id != target);
        Some(target)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<EntityId> for AssociationSet {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        let mut set = AssociationSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl From<Vec<EntityId>> for AssociationSet {
    fn from(ids: Vec<EntityId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<AssociationSet> for Vec<EntityId> {
    fn from(set: AssociationSet) -> Self {
        set.ids
    }
}

/// A grantable permission. Seeded only, never edited here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: EntityId,
    pub name: String,
}

impl Permission {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A role and the permissions it grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,

    /// Granted permission ids
    #[serde(default)]
    pub permissions: AssociationSet,
}

impl Role {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions: AssociationSet::new(),
        }
    }
}

/// A user and the roles assigned to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,

    /// Assigned role ids
    #[serde(default)]
    pub roles: AssociationSet,
}

impl User {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roles: AssociationSet::new(),
        }
    }
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(
            impl Named for $ty {
                fn id(&self) -> EntityId {
                    self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_named!(Permission, Role, User);

/// Owner side of an association: a user owns roles, a role owns permissions
pub trait AssociationOwner: Named + Clone {
    fn associations(&self) -> &AssociationSet;
    fn associations_mut(&mut self) -> &mut AssociationSet;
}

impl AssociationOwner for User {
    fn associations(&self) -> &AssociationSet {
        &self.roles
    }

    fn associations_mut(&mut self) -> &mut AssociationSet {
        &mut self.roles
    }
}

impl AssociationOwner for Role {
    fn associations(&self) -> &AssociationSet {
        &self.permissions
    }

    fn associations_mut(&mut self) -> &mut AssociationSet {
        &mut self.permissions
    }
}
