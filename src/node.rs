/*
 * Created on Thu Feb 15 2024
 *
 * This file is a part of FolderTree
 * FolderTree is a free and open-source in-memory concurrent hierarchical
 * folder tree library, built for maximal read parallelism under a strict
 * serializability guarantee.
 *
 * Copyright (c) 2024, FolderTree Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! # Folder nodes
//!
//! A [`Node`] is a folder: a child map plus a weak back-reference to its
//! parent, guarded by the [`NodeLock`] embedded in it. The child map lives
//! behind an [`UnsafeCell`] rather than, say, a second `parking_lot::Mutex`,
//! because its exclusion is already provided by `lock` itself — the same
//! trick [`NodeLock`]'s own counters rely on internally, just one level up.
//! Callers only ever reach a [`Node`]'s children through
//! [`Node::children`]/[`Node::children_mut`], both of which require the
//! corresponding lock discipline to already be held; see the `# Safety`
//! notes on each.

use crate::children::ChildMap;
use crate::sync::NodeLock;
use parking_lot::Mutex;
use std::cell::UnsafeCell;
use std::sync::{Arc, Weak};

pub(crate) struct Node {
    pub(crate) lock: NodeLock,
    children: UnsafeCell<ChildMap>,
    parent: Mutex<Option<Weak<Node>>>,
}

// SAFETY: all access to `children` is mediated by `lock`'s read/write
// discipline, enforced by convention at every call site in this crate
// (never exposed outside it); `parent` has its own mutex.
unsafe impl Send for Node {}
unsafe impl Sync for Node {}

impl Node {
    /// A fresh node with no parent set yet (the caller links it in)
    pub(crate) fn new_detached(lock: NodeLock, child_capacity_hint: usize) -> Self {
        Self {
            lock,
            children: UnsafeCell::new(ChildMap::with_capacity(child_capacity_hint)),
            parent: Mutex::new(None),
        }
    }

    pub(crate) fn new_root(child_capacity_hint: usize) -> Arc<Self> {
        Arc::new(Self::new_detached(NodeLock::new(), child_capacity_hint))
    }

    pub(crate) fn new_child(child_capacity_hint: usize, parent: &Arc<Node>) -> Arc<Self> {
        let node = Self::new_detached(NodeLock::new(), child_capacity_hint);
        *node.parent.lock() = Some(Arc::downgrade(parent));
        Arc::new(node)
    }

    /// # Safety
    /// The caller must hold at least a read lock on this node, *or* have
    /// just called [`NodeLock::subtree_wait`](crate::sync::NodeLock::subtree_wait)
    /// on it while holding its parent's write lock (the only other path to
    /// this node), which rules out concurrent access just as surely.
    pub(crate) unsafe fn children(&self) -> &ChildMap {
        &*self.children.get()
    }

    /// # Safety
    /// The caller must hold the write lock on this node.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn children_mut(&self) -> &mut ChildMap {
        &mut *self.children.get()
    }

    /// The current parent, if any (absent only for the root)
    pub(crate) fn parent(&self) -> Option<Arc<Node>> {
        self.parent.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Rewrite the parent back-reference. Only ever called by `move`, under
    /// both the old and new parent's write locks, after `subtree_wait` has
    /// confirmed no concurrent traverser is inside this node.
    pub(crate) fn set_parent(&self, new_parent: &Arc<Node>) {
        *self.parent.lock() = Some(Arc::downgrade(new_parent));
    }
}
