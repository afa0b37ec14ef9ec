//! In-memory user store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use roster_core::{NewUser, User, UserId};

use super::{IdGenerator, IdStrategy, UserStore, seed_users};

/// User store backed by a `Vec` behind a lock.
///
/// Insertion order is preserved for listing. A poisoned lock is recovered
/// rather than propagated: every operation leaves the collection consistent
/// before it can panic.
#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
    ids: IdGenerator,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(strategy: IdStrategy) -> Self {
        Self::with_users(strategy, Vec::new())
    }

    /// Create a store holding the demo seed records.
    #[must_use]
    pub fn seeded(strategy: IdStrategy) -> Self {
        Self::with_users(strategy, seed_users())
    }

    /// Create a store holding `users`, in order.
    #[must_use]
    pub fn with_users(strategy: IdStrategy, users: Vec<User>) -> Self {
        let ids = IdGenerator::new(strategy, &users);
        Self {
            users: RwLock::new(users),
            ids,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserStore for InMemoryUserStore {
    fn list(&self) -> Vec<User> {
        self.read().clone()
    }

    fn create(&self, new_user: NewUser) -> User {
        let mut users = self.write();

        let mut id = self.ids.next_id();
        while users.iter().any(|user| user.id == id) {
            id = self.ids.next_id();
        }

        let user = new_user.with_id(id);
        users.push(user.clone());
        tracing::info!(user_id = %user.id, total = users.len(), "User created");
        user
    }

    fn replace(&self, user: User) -> Option<User> {
        let mut users = self.write();

        let Some(slot) = users.iter_mut().find(|existing| existing.id == user.id) else {
            tracing::debug!(user_id = %user.id, "Replace target not found");
            return None;
        };

        slot.clone_from(&user);
        tracing::info!(user_id = %user.id, "User replaced");
        Some(user)
    }

    fn delete(&self, id: &UserId) -> Option<User> {
        let mut users = self.write();

        let Some(index) = users.iter().position(|user| &user.id == id) else {
            tracing::debug!(user_id = %id, "Delete target not found");
            return None;
        };

        let removed = users.remove(index);
        tracing::info!(user_id = %id, total = users.len(), "User deleted");
        Some(removed)
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_user(first_name: &str) -> NewUser {
        NewUser {
            first_name: first_name.to_string(),
            ..NewUser::placeholder()
        }
    }

    fn ids(store: &InMemoryUserStore) -> Vec<String> {
        store
            .list()
            .into_iter()
            .map(|user| user.id.into_inner())
            .collect()
    }

    #[test]
    fn test_seeded_store_lists_seed_records_in_order() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);
        let users = store.list();
        assert_eq!(users, seed_users());
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_create_appends_with_unused_id() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);
        let before = ids(&store);

        let created = store.create(new_user("Ada"));

        assert!(!before.contains(&created.id.to_string()));
        let users = store.list();
        assert_eq!(users.len(), 3);
        assert_eq!(users.last(), Some(&created));
        assert_eq!(users.iter().filter(|u| **u == created).count(), 1);
        assert_eq!(created.first_name, "Ada");
    }

    #[test]
    fn test_replace_overwrites_every_field() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);
        let replacement = User {
            id: UserId::new("1"),
            first_name: "Updated".to_string(),
            last_name: "Person".to_string(),
            email: "u@example.com".to_string(),
            alternate_email: "u.alt@example.com".to_string(),
            password: "other".to_string(),
            age: 61,
        };

        let stored = store.replace(replacement.clone());

        assert_eq!(stored, Some(replacement.clone()));
        assert_eq!(store.list()[0], replacement);
        assert_eq!(store.list()[1], seed_users()[1]);
    }

    #[test]
    fn test_replace_missing_id_is_distinguishable_and_changes_nothing() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);
        let ghost = NewUser::placeholder().with_id(UserId::new("404"));

        assert_eq!(store.replace(ghost), None);
        assert_eq!(store.list(), seed_users());
    }

    #[test]
    fn test_delete_removes_only_target_and_keeps_order() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);
        let third = store.create(new_user("Third"));

        let removed = store.delete(&UserId::new("2"));

        assert_eq!(removed.map(|u| u.first_name), Some("Jane".to_string()));
        let users = store.list();
        assert_eq!(users, vec![seed_users()[0].clone(), third]);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);

        assert_eq!(store.delete(&UserId::new("nope")), None);
        assert_eq!(store.list(), seed_users());
    }

    #[test]
    fn test_seed_create_delete_scenario() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);

        let created = store.create(new_user("Third"));
        assert_eq!(store.len(), 3);
        assert_ne!(created.id.as_str(), "1");
        assert_ne!(created.id.as_str(), "2");

        store.delete(&UserId::new("1"));
        assert_eq!(ids(&store), vec!["2".to_string(), created.id.into_inner()]);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = InMemoryUserStore::seeded(IdStrategy::Sequential);
        let third = store.create(new_user("Third"));
        store.delete(&third.id);
        store.delete(&UserId::new("2"));

        let fourth = store.create(new_user("Fourth"));

        assert_ne!(fourth.id, third.id);
        assert_ne!(fourth.id.as_str(), "2");
        assert_eq!(fourth.id.as_str(), "4");
    }

    #[test]
    fn test_create_skips_ids_already_present() {
        let mut seeded = seed_users();
        seeded.push(NewUser::placeholder().with_id(UserId::new("0003")));
        let store = InMemoryUserStore::with_users(IdStrategy::Sequential, seeded);

        let created = store.create(new_user("Next"));
        assert_eq!(created.id.as_str(), "4");
    }

    #[test]
    fn test_uuid_strategy_creates_unique_ids() {
        let store = InMemoryUserStore::new(IdStrategy::Uuid);
        let a = store.create(new_user("A"));
        let b = store.create(new_user("B"));
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(InMemoryUserStore::new(IdStrategy::Sequential));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(new_user(&format!("U{i}"))).id })
            })
            .collect();

        let mut created = Vec::new();
        for handle in handles {
            created.push(handle.await.unwrap());
        }
        created.sort();
        created.dedup();
        assert_eq!(created.len(), 32);
        assert_eq!(store.len(), 32);
    }
}
