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

//! # The per-node reader/writer/subtree lock
//!
//! This is the whole concurrency protocol in one place: a monitor with five
//! counters and three condition variables, guarding nothing but itself.
//! Every other synchronization decision in this crate (hand-over-hand
//! traversal, subtree quiescence before remove/move) is built by composing
//! calls into this primitive along a path of nodes — see [`crate::locker`].
//!
//! Unlike `std::sync::RwLock`, callers call `read_lock`/`read_unlock` (and
//! the write/subtree equivalents) as separate, non-lexically-scoped calls:
//! the path locker needs to hold a *chain* of these locks, released in an
//! order that doesn't follow Rust's usual stack discipline for any single
//! node, even though the chain as a whole unwinds in a disciplined
//! leaf-to-root order (see [`crate::locker::LockChain`]).

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Counters {
    read_count: u32,
    write_count: u8,
    read_wait: u32,
    write_wait: u32,
    subtree_count: u32,
}

#[derive(Debug)]
pub(crate) struct NodeLock {
    state: Mutex<Counters>,
    read_cv: Condvar,
    write_cv: Condvar,
    subtree_cv: Condvar,
}

impl NodeLock {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(Counters::default()),
            read_cv: Condvar::new(),
            write_cv: Condvar::new(),
            subtree_cv: Condvar::new(),
        }
    }

    /// Block until a shared read lock on this node is held
    pub(crate) fn read_lock(&self) {
        let mut g = self.state.lock();
        g.subtree_count += 1;
        if g.write_count > 0 || g.write_wait > 0 {
            log::trace!(
                "read_lock: contended (write_count={}, write_wait={}), blocking",
                g.write_count,
                g.write_wait
            );
        }
        while g.write_count > 0 || g.write_wait > 0 {
            g.read_wait += 1;
            self.read_cv.wait(&mut g);
            g.read_wait -= 1;
        }
        g.read_count += 1;
        // cascade-wake: let the next waiting reader, if any, proceed too
        self.read_cv.notify_one();
    }

    /// Release a previously acquired read lock
    pub(crate) fn read_unlock(&self) {
        let mut g = self.state.lock();
        debug_assert!(g.read_count > 0, "read_unlock on a node with no readers");
        g.read_count -= 1;
        if g.read_count == 0 {
            self.write_cv.notify_one();
        }
        g.subtree_count -= 1;
        if g.subtree_count <= 1 {
            self.subtree_cv.notify_one();
        }
    }

    /// Block until the exclusive write lock on this node is held
    pub(crate) fn write_lock(&self) {
        let mut g = self.state.lock();
        g.subtree_count += 1;
        if g.write_count > 0 || g.read_count > 0 {
            log::trace!(
                "write_lock: contended (write_count={}, read_count={}), blocking",
                g.write_count,
                g.read_count
            );
        }
        while g.write_count > 0 || g.read_count > 0 {
            g.write_wait += 1;
            self.write_cv.wait(&mut g);
            g.write_wait -= 1;
        }
        g.write_count = 1;
    }

    /// Release a previously acquired write lock
    pub(crate) fn write_unlock(&self) {
        let mut g = self.state.lock();
        debug_assert_eq!(g.write_count, 1, "write_unlock on a node with no writer");
        g.write_count = 0;
        if g.read_wait > 0 {
            // start the reader cascade
            self.read_cv.notify_one();
        } else {
            self.write_cv.notify_one();
        }
        g.subtree_count -= 1;
        if g.subtree_count <= 1 {
            self.subtree_cv.notify_one();
        }
    }

    /// Block until this node's subtree is quiescent, i.e. this call is the
    /// only party accounted for in `subtree_count`.
    ///
    /// The caller must already hold this node's *parent* write-locked so
    /// that no new traverser can enter this node while we wait.
    pub(crate) fn subtree_wait(&self) {
        let mut g = self.state.lock();
        g.subtree_count += 1;
        if g.subtree_count > 1 {
            log::trace!(
                "subtree_wait: contended (subtree_count={}), draining in-flight traversers",
                g.subtree_count
            );
        }
        while g.subtree_count > 1 {
            self.subtree_cv.wait(&mut g);
        }
        g.subtree_count -= 1;
    }

    #[cfg(test)]
    fn snapshot(&self) -> (u32, u8, u32, u32, u32) {
        let g = self.state.lock();
        (g.read_count, g.write_count, g.read_wait, g.write_wait, g.subtree_count)
    }
}
