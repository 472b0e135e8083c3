//! In-memory entity storage.
//!
//! The store only knows about ids: it resolves, inserts, replaces and removes records and
//! reports dangling references. Workflow rules live in [`crate::workflow`] and the façade.

use indexmap::IndexMap;

use crate::error::BoardError;
use crate::models::{Column, Task, TeamMember};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Column,
    Member,
}

/// A record kept in an [`EntityStore`].
pub trait Entity: Clone + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn collection(store: &EntityStore) -> &Collection<Self>;

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;

    /// Called before the record is removed; an error aborts the delete.
    fn check_delete(_store: &EntityStore, _id: &str) -> Result<(), BoardError> {
        Ok(())
    }
}

fn unknown(kind: EntityKind, id: &str) -> BoardError {
    match kind {
        EntityKind::Task => BoardError::unknown_task(id),
        EntityKind::Column => BoardError::unknown_column(id),
        EntityKind::Member => BoardError::unknown_member(id),
    }
}

/// Records of one kind keyed by id, in insertion order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Insert or replace. A replaced record keeps its position.
    pub fn put(&mut self, entity: T) -> Option<T> {
        self.items.insert(entity.id().to_string(), entity)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.items.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    tasks: Collection<Task>,
    columns: Collection<Column>,
    members: Collection<TeamMember>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Entity>(&self, id: &str) -> Result<&T, BoardError> {
        T::collection(self).get(id).ok_or_else(|| unknown(T::KIND, id))
    }

    pub fn contains<T: Entity>(&self, id: &str) -> bool {
        T::collection(self).contains(id)
    }

    pub fn put<T: Entity>(&mut self, entity: T) -> Option<T> {
        T::collection_mut(self).put(entity)
    }

    pub fn delete<T: Entity>(&mut self, id: &str) -> Result<T, BoardError> {
        if !self.contains::<T>(id) {
            return Err(unknown(T::KIND, id));
        }
        T::check_delete(self, id)?;
        T::collection_mut(self)
            .remove(id)
            .ok_or_else(|| unknown(T::KIND, id))
    }

    pub fn all<T: Entity>(&self) -> impl Iterator<Item = &T> {
        T::collection(self).iter()
    }

    pub fn count<T: Entity>(&self) -> usize {
        T::collection(self).len()
    }

    pub fn task(&self, id: &str) -> Result<&Task, BoardError> {
        self.get::<Task>(id)
    }

    pub fn column(&self, id: &str) -> Result<&Column, BoardError> {
        self.get::<Column>(id)
    }

    pub fn member(&self, id: &str) -> Result<&TeamMember, BoardError> {
        self.get::<TeamMember>(id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Tasks that take part in the board views.
    pub fn active_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.archived)
    }

    /// Columns in board order.
    pub fn columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order);
        columns
    }

    pub fn first_column(&self) -> Option<&Column> {
        self.columns.iter().min_by_key(|c| c.order)
    }

    pub fn members(&self) -> impl Iterator<Item = &TeamMember> {
        self.members.iter()
    }

    /// Non-done tasks that list `task_id` as a dependency.
    pub fn open_dependents(&self, task_id: &str) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|t| t.is_open() && t.dependencies.contains(task_id))
            .map(|t| t.id.clone())
            .collect()
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.tasks
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.tasks
    }

    fn check_delete(store: &EntityStore, id: &str) -> Result<(), BoardError> {
        let dependents = store.open_dependents(id);
        if dependents.is_empty() {
            Ok(())
        } else {
            Err(BoardError::referential_integrity(id, dependents))
        }
    }
}

impl Entity for Column {
    const KIND: EntityKind = EntityKind::Column;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.columns
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.columns
    }
}

impl Entity for TeamMember {
    const KIND: EntityKind = EntityKind::Member;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.members
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.members
    }
}
