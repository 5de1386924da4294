//! Node storage for programs.
//!
//! A program keeps its expressions, statements, variables, functions and
//! types in append-only containers addressed by [`Handle`]s. Each container
//! carries an [`ArenaId`] that is baked into the handles it hands out, and a
//! lookup with a handle minted elsewhere (another program, or the same
//! container before [`Arena::reset`]) panics at the lookup site.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{self, AtomicU32};

use crate::error::IrError;

static ARENA_IDS: AtomicU32 = AtomicU32::new(1);

/// Process-unique tag of a node container.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ArenaId(u32);

impl ArenaId {
    pub(crate) fn fresh() -> Self {
        Self(ARENA_IDS.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Typed reference to a node stored in an [`Arena`] or [`UniqueArena`].
///
/// Two handles are equal only when both the slot and the issuing container
/// match, so handles from different programs never alias.
pub struct Handle<T> {
    slot: u32,
    owner: ArenaId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn at(slot: usize, owner: ArenaId) -> Self {
        let slot = u32::try_from(slot)
            .unwrap_or_else(|_| panic!("node container is full ({slot} slots)"));
        Self {
            slot,
            owner,
            _marker: PhantomData,
        }
    }

    fn key(self) -> (ArenaId, u32) {
        (self.owner, self.slot)
    }

    /// Position of the node in its container.
    pub fn index(self) -> usize {
        self.slot as usize
    }

    /// Container that issued this handle.
    pub fn arena(self) -> ArenaId {
        self.owner
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.slot)
    }
}

fn assert_owned<T>(handle: Handle<T>, owner: ArenaId) -> usize {
    assert!(
        handle.owner == owner,
        "handle {handle:?} was issued by arena {} but used with arena {owner}",
        handle.owner,
    );
    handle.index()
}

fn handles<T>(owner: ArenaId, items: &[T]) -> impl Iterator<Item = (Handle<T>, &T)> {
    items
        .iter()
        .enumerate()
        .map(move |(slot, item)| (Handle::at(slot, owner), item))
}

/// Append-only node storage.
#[derive(Debug)]
pub struct Arena<T> {
    id: ArenaId,
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            id: ArenaId::fresh(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stores `value` and returns the handle that addresses it.
    pub fn append(&mut self, value: T) -> Handle<T> {
        let handle = Handle::at(self.items.len(), self.id);
        self.items.push(value);
        handle
    }

    /// Whether `handle` addresses a live node of this arena.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        handle.owner == self.id && handle.index() < self.items.len()
    }

    /// Non-panicking lookup. Foreign and out-of-range handles yield `None`.
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.contains(handle).then(|| &self.items[handle.index()])
    }

    pub fn try_get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.owner == self.id {
            self.items.get_mut(handle.index())
        } else {
            None
        }
    }

    /// Lookup that reports why a handle does not resolve.
    pub fn get(&self, handle: Handle<T>) -> Result<&T, IrError> {
        if handle.owner != self.id {
            return Err(IrError::ForeignHandle {
                index: handle.index(),
                owner: handle.owner,
                arena: self.id,
            });
        }
        let size = self.items.len();
        self.items.get(handle.index()).ok_or(IrError::BadHandle {
            index: handle.index(),
            size,
        })
    }

    /// Empties the arena under a new id, orphaning every handle issued so far.
    pub fn reset(&mut self) {
        self.items.clear();
        self.id = ArenaId::fresh();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        handles(self.id, &self.items)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        let owner = self.id;
        self.items
            .iter_mut()
            .enumerate()
            .map(move |(slot, item)| (Handle::at(slot, owner), item))
    }
}

impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[assert_owned(handle, self.id)]
    }
}

impl<T> IndexMut<Handle<T>> for Arena<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        let slot = assert_owned(handle, self.id);
        &mut self.items[slot]
    }
}

/// Interning storage: equal values share one handle.
#[derive(Debug)]
pub struct UniqueArena<T> {
    id: ArenaId,
    items: Vec<T>,
    lookup: HashMap<T, u32>,
}

impl<T: Hash + Eq> Default for UniqueArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> UniqueArena<T> {
    pub fn new() -> Self {
        Self {
            id: ArenaId::fresh(),
            items: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Interns `value`. A value equal to an earlier one gets that one's handle.
    pub fn insert(&mut self, value: T) -> Handle<T>
    where
        T: Clone,
    {
        if let Some(existing) = self.get(&value) {
            return existing;
        }
        let handle = Handle::at(self.items.len(), self.id);
        self.lookup.insert(value.clone(), handle.slot);
        self.items.push(value);
        handle
    }

    /// Handle of an already interned value.
    pub fn get<Q>(&self, value: &Q) -> Option<Handle<T>>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.lookup.get(value)?;
        Some(Handle::at(slot as usize, self.id))
    }

    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        if handle.owner == self.id {
            self.items.get(handle.index())
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.lookup.clear();
        self.id = ArenaId::fresh();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        handles(self.id, &self.items)
    }
}

impl<T> Index<Handle<T>> for UniqueArena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[assert_owned(handle, self.id)]
    }
}
