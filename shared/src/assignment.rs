//! Role and permission assignment
//!
//! In-memory directory backing the access administration screen:
//! - association edits on a selected owner (user → roles, role → permissions)
//! - role creation with collision-free ids
//! - name filtering for the pickers

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AssociationOwner, EntityId, Named, Permission, Role, User};

/// Errors raised by directory operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("Role name must not be empty")]
    EmptyRoleName,

    #[error("Unknown user: {0}")]
    UnknownUser(EntityId),

    #[error("Unknown role: {0}")]
    UnknownRole(EntityId),
}

/// Monotonic id source. Ids handed out are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    next: EntityId,
}

impl IdSequence {
    /// Start after the highest id already in use
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a EntityId>) -> Self {
        let max = existing.into_iter().copied().max().unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn peek(&self) -> EntityId {
        self.next
    }
}

/// Return a copy of `owner` with `item` appended to its associations.
///
/// Adding an item that is already associated returns an unchanged copy.
pub fn add_association<O: AssociationOwner>(owner: &O, item: EntityId) -> O {
    let mut updated = owner.clone();
    if !updated.associations_mut().insert(item) {
        debug!(owner = owner.id(), item, "association already present");
    }
    updated
}

/// Return a copy of `owner` without the association shown at `index`.
///
/// The id at `index` is resolved before filtering; an out-of-range index
/// returns an unchanged copy.
pub fn remove_association_at<O: AssociationOwner>(owner: &O, index: usize) -> O {
    let mut updated = owner.clone();
    match updated.associations_mut().remove_at(index) {
        Some(item) => debug!(owner = owner.id(), item, index, "association removed"),
        None => debug!(owner = owner.id(), index, "no association at index"),
    }
    updated
}

/// Case-insensitive substring filter used by the pickers.
/// An empty query matches everything.
pub fn filter_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || item.name().to_lowercase().contains(&needle))
        .collect()
}

/// Users, roles and permissions held by the assignment screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    role_ids: IdSequence,
}

impl Directory {
    pub fn new(users: Vec<User>, roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        let role_ids = IdSequence::after(roles.iter().map(|r| &r.id));
        Self {
            users,
            roles,
            permissions,
            role_ids,
        }
    }

    /// Seed data shown before any backend is wired in
    pub fn seeded() -> Self {
        Self::new(
            vec![User::new(1, "User 1"), User::new(2, "User 2")],
            vec![Role::new(1, "Role 1"), Role::new(2, "Role 2")],
            vec![Permission::new(1, "Permission 1"), Permission::new(2, "Permission 2")],
        )
    }

    pub fn user(&self, id: EntityId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn role(&self, id: EntityId) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn permission(&self, id: EntityId) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.id == id)
    }

    /// Append a new role with no permissions and return its id
    pub fn create_role(&mut self, name: &str) -> Result<EntityId, AssignmentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AssignmentError::EmptyRoleName);
        }

        let id = self.role_ids.next_id();
        self.roles.push(Role::new(id, name));
        debug!(id, name, "role created");
        Ok(id)
    }

    /// Write an edited user back into the list
    pub fn commit_user(&mut self, user: User) -> Result<(), AssignmentError> {
        let slot = self
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AssignmentError::UnknownUser(user.id))?;
        *slot = user;
        Ok(())
    }

    /// Write an edited role back into the list
    pub fn commit_role(&mut self, role: Role) -> Result<(), AssignmentError> {
        let slot = self
            .roles
            .iter_mut()
            .find(|r| r.id == role.id)
            .ok_or(AssignmentError::UnknownRole(role.id))?;
        *slot = role;
        Ok(())
    }

    /// Resolve a user's role ids into displayable tags, in display order
    pub fn role_tags(&self, user: &User) -> Vec<Tag> {
        user.roles
            .iter()
            .map(|id| Tag::resolve(id, self.role(id).map(|r| r.name.as_str())))
            .collect()
    }

    /// Resolve a role's permission ids into displayable tags, in display order
    pub fn permission_tags(&self, role: &Role) -> Vec<Tag> {
        role.permissions
            .iter()
            .map(|id| Tag::resolve(id, self.permission(id).map(|p| p.name.as_str())))
            .collect()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::seeded()
    }
}

/// A resolved association as shown in a tag input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: EntityId,
    pub label: String,
}

impl Named for Tag {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.label
    }
}

impl Tag {
    /// Picker entries for a list of users, roles or permissions
    pub fn options<T: Named>(items: &[T]) -> Vec<Tag> {
        items.iter().map(|item| Tag::resolve(item.id(), Some(item.name()))).collect()
    }

    fn resolve(id: EntityId, name: Option<&str>) -> Self {
        Self {
            id,
            label: name.map(str::to_string).unwrap_or_else(|| format!("#{id}")),
        }
    }
}

/// The "create role" input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRoleForm {
    pub name: String,
}

impl NewRoleForm {
    /// Create the role and clear the input. On error the input is kept.
    pub fn submit(&mut self, directory: &mut Directory) -> Result<EntityId, AssignmentError> {
        let id = directory.create_role(&self.name)?;
        self.name.clear();
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role_after_two_seeded() {
        let mut directory = Directory::seeded();
        let mut form = NewRoleForm {
            name: "Auditors".to_string(),
        };

        let id = form.submit(&mut directory).unwrap();

        assert_eq!(id, 3);
        let role = directory.role(3).unwrap();
        assert_eq!(role.name, "Auditors");
        assert!(role.permissions.is_empty());
        assert_eq!(form.name, "");
    }

    #[test]
    fn test_create_role_rejects_blank_name() {
        let mut directory = Directory::seeded();
        let mut form = NewRoleForm {
            name: "   ".to_string(),
        };

        assert_eq!(form.submit(&mut directory), Err(AssignmentError::EmptyRoleName));
        assert_eq!(directory.roles.len(), 2);
        assert_eq!(form.name, "   ");
    }

    #[test]
    fn test_role_ids_not_reused_after_delete() {
        let mut directory = Directory::seeded();
        let third = directory.create_role("Third").unwrap();
        directory.roles.retain(|r| r.id != 1);

        // count + 1 would hand out 3 again here
        let fourth = directory.create_role("Fourth").unwrap();
        assert_eq!(third, 3);
        assert_eq!(fourth, 4);
    }

    #[test]
    fn test_sequence_starts_after_highest_id() {
        let directory = Directory::new(vec![], vec![Role::new(7, "a"), Role::new(2, "b")], vec![]);
        assert_eq!(directory.role_ids.peek(), 8);
    }

    #[test]
    fn test_remove_by_display_index_uses_id_at_index() {
        let user = User {
            id: 1,
            name: "User 1".to_string(),
            roles: [2, 1].into_iter().collect(),
        };

        let updated = remove_association_at(&user, 0);

        assert_eq!(updated.roles.iter().collect::<Vec<_>>(), vec![1]);
        // Source owner is untouched
        assert_eq!(user.roles.len(), 2);
    }

    #[test]
    fn test_add_association_is_idempotent() {
        let role = Role::new(1, "Role 1");
        let once = add_association(&role, 2);
        let twice = add_association(&once, 2);

        assert_eq!(once, twice);
        assert_eq!(twice.permissions.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_commit_user_writes_back() {
        let mut directory = Directory::seeded();
        let user = directory.user(2).cloned().unwrap();
        let edited = add_association(&user, 1);

        directory.commit_user(edited).unwrap();

        assert!(directory.user(2).unwrap().roles.contains(1));
        assert_eq!(
            directory.commit_user(User::new(99, "ghost")),
            Err(AssignmentError::UnknownUser(99))
        );
    }

    #[test]
    fn test_tags_follow_display_order() {
        let mut directory = Directory::seeded();
        let role = Role {
            id: 1,
            name: "Role 1".to_string(),
            permissions: [2, 1, 42].into_iter().collect(),
        };
        directory.commit_role(role.clone()).unwrap();

        let labels: Vec<_> = directory
            .permission_tags(&role)
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["Permission 2", "Permission 1", "#42"]);
    }

    #[test]
    fn test_filter_by_name() {
        let directory = Directory::seeded();
        let hits = filter_by_name(&directory.roles, "role 2");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        assert_eq!(filter_by_name(&directory.roles, "").len(), 2);
        assert!(filter_by_name(&directory.roles, "nope").is_empty());

        let options = Tag::options(&directory.permissions);
        let hits = filter_by_name(&options, "PERMISSION 1");
        assert_eq!(hits, vec![&Tag { id: 1, label: "Permission 1".to_string() }]);
    }
}
