// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Generational arena. Handles stay valid until their slot is removed;
//! a reused slot bumps the generation so stale handles never alias.

use std::marker::PhantomData;

pub trait ArenaKey: Copy {
    fn from_parts(index: u32, generation: u32) -> Self;
    fn index(self) -> u32;
    fn generation(self) -> u32;
}

macro_rules! arena_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl ArenaKey for $name {
            fn from_parts(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            fn index(self) -> u32 {
                self.index
            }

            fn generation(self) -> u32 {
                self.generation
            }
        }
    };
}

arena_key!(
    /// Handle to a [`crate::value::Value`] inside its function.
    ValueId
);

arena_key!(
    /// Handle to a [`crate::block::Block`] inside its function.
    BlockId
);

#[derive(Debug, Clone)]
enum Entry<T> {
    Occupied { generation: u32, value: T },
    Free { generation: u32 },
}

#[derive(Debug, Clone)]
pub struct Arena<K: ArenaKey, T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            entries: vec![],
            free: vec![],
            len: 0,
            _key: PhantomData
        }
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> K {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.entries[index as usize];
            let generation = match slot {
                Entry::Free { generation } => *generation + 1,
                Entry::Occupied { .. } => mcc_utils::bug!("free list points at an occupied slot"),
            };
            *slot = Entry::Occupied { generation, value };
            return K::from_parts(index, generation);
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry::Occupied { generation: 0, value });
        K::from_parts(index, 0)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        match self.entries.get(key.index() as usize)? {
            Entry::Occupied { generation, value } if *generation == key.generation() => Some(value),
            _ => None
        }
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.entries.get_mut(key.index() as usize)? {
            Entry::Occupied { generation, value } if *generation == key.generation() => Some(value),
            _ => None
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: K) -> Option<T> {
        if !self.contains(key) {
            return None;
        }
        let index = key.index() as usize;
        let old = std::mem::replace(&mut self.entries[index], Entry::Free { generation: key.generation() });
        self.free.push(key.index());
        self.len -= 1;
        match old {
            Entry::Occupied { value, .. } => Some(value),
            Entry::Free { .. } => None
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| match entry {
            Entry::Occupied { generation, value } => Some((K::from_parts(index as u32, *generation), value)),
            Entry::Free { .. } => None
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }
}
