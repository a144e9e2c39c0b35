/*
 * Created on Fri Feb 16 2024
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

//! # Hand-over-hand path locking
//!
//! Every operation reaches the node(s) it needs through the walks defined
//! here rather than by poking [`NodeLock`](crate::sync::NodeLock) directly.
//! A walk locks root-first, descendant-next, looking a child up only once
//! its parent is locked; a [`LockChain`] remembers the order nodes were
//! acquired in so it can release them leaf-to-root, which is the only
//! release order that's always safe (see `SPEC_FULL.md` §4.2).

use crate::node::Node;
use crate::path::{split_path, ROOT};
use std::sync::Arc;

/// One link of a held lock chain
enum Held {
    Read(Arc<Node>),
    Write(Arc<Node>),
}

impl Held {
    fn node(&self) -> &Arc<Node> {
        match self {
            Self::Read(n) | Self::Write(n) => n,
        }
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        match self {
            Self::Read(n) => n.lock.read_unlock(),
            Self::Write(n) => n.lock.write_unlock(),
        }
    }
}

/// A chain of locks held root-to-leaf along some path, released leaf-to-root
/// on drop regardless of how far traversal actually got.
pub(crate) struct LockChain(Vec<Held>);

impl LockChain {
    fn empty() -> Self {
        Self(Vec::new())
    }

    fn push_read(&mut self, node: Arc<Node>) {
        node.lock.read_lock();
        self.0.push(Held::Read(node));
    }

    fn push_write(&mut self, node: Arc<Node>) {
        node.lock.write_lock();
        self.0.push(Held::Write(node));
    }

    /// The last-acquired node in the chain — the path's terminal node
    pub(crate) fn target(&self) -> &Arc<Node> {
        self.0.last().expect("empty lock chain has no target").node()
    }
}

impl Drop for LockChain {
    fn drop(&mut self) {
        // release leaf-to-root: pop from the back, which is always the
        // most recently (innermost) acquired lock
        while let Some(held) = self.0.pop() {
            drop(held);
        }
    }
}

/// Read-lock every node from `root` down to `path`, inclusive. Returns
/// `None`, with every lock already released, if some component is missing.
pub(crate) fn read_lock_path(root: &Arc<Node>, path: &str) -> Option<LockChain> {
    lock_path_generic(root, path, false)
}

/// Like [`read_lock_path`], but the terminal node is write-locked instead
/// (ancestors, if any, remain read-locked).
pub(crate) fn read_write_lock_path(root: &Arc<Node>, path: &str) -> Option<LockChain> {
    lock_path_generic(root, path, true)
}

fn lock_path_generic(root: &Arc<Node>, path: &str, terminal_write: bool) -> Option<LockChain> {
    let mut chain = LockChain::empty();
    if path == ROOT {
        if terminal_write {
            chain.push_write(root.clone());
        } else {
            chain.push_read(root.clone());
        }
        return Some(chain);
    }
    chain.push_read(root.clone());
    let mut current = root.clone();
    let mut remaining = path;
    loop {
        let (name, rest) = split_path(remaining);
        // SAFETY: `current` was just read-locked above (or is the root,
        // locked before the loop started)
        let next = unsafe { current.children() }.get(name).cloned()?;
        match rest {
            Some(r) => {
                chain.push_read(next.clone());
                current = next;
                remaining = r;
            }
            None => {
                if terminal_write {
                    chain.push_write(next);
                } else {
                    chain.push_read(next);
                }
                return Some(chain);
            }
        }
    }
}

/// Descend from `start` (already write-locked by the caller, and *not*
/// re-acquired or released here) along `relative_path`, write-locking the
/// terminal node and read-locking everything strictly in between.
///
/// `relative_path` is in the same "remaining path" shape `split_path`
/// produces: it starts with `/` and names components below `start`, never
/// `start` itself. Callers must special-case the "`start` is already the
/// target's parent" situation themselves — it takes no lock at all here.
pub(crate) fn read_write_lock_path_excluding(
    start: &Arc<Node>,
    relative_path: &str,
) -> Option<LockChain> {
    let mut chain = LockChain::empty();
    let mut current = start.clone();
    let mut remaining = relative_path;
    loop {
        let (name, rest) = split_path(remaining);
        // SAFETY: `current` is either `start` (write-locked by the caller)
        // or a node we just read-locked below
        let next = unsafe { current.children() }.get(name).cloned()?;
        match rest {
            Some(r) => {
                chain.push_read(next.clone());
                current = next;
                remaining = r;
            }
            None => {
                chain.push_write(next);
                return Some(chain);
            }
        }
    }
}
