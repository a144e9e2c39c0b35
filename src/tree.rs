/*
 * Created on Sat Feb 17 2024
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

//! # The tree handle and its four operations
//!
//! Everything below this module is plumbing; `list`/`create`/`remove`/`mv`
//! are where the plumbing actually gets composed into the protocol
//! described in `SPEC_FULL.md` §4.3-4.6. None of these four ever inspects
//! more tree state than the lock chain they're currently holding permits.

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::locker::{read_lock_path, read_write_lock_path, read_write_lock_path_excluding};
use crate::node::Node;
use crate::path::{is_path_valid, is_strict_ancestor, longest_common_prefix, make_path_to_parent, ROOT};
use std::sync::Arc;

/// A concurrent, in-memory, rooted folder tree
pub struct Tree {
    root: Arc<Node>,
    config: TreeConfig,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a fresh tree containing only the root, `/`
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a fresh tree with a non-default [`TreeConfig`]
    pub fn with_config(config: TreeConfig) -> Self {
        log::debug!(
            "tree_new: max_folder_name_length={}, child_capacity_hint={}",
            config.max_folder_name_length,
            config.child_capacity_hint
        );
        Self {
            root: Node::new_root(config.child_capacity_hint),
            config,
        }
    }

    /// Tear the tree down. Equivalent to dropping it; provided so callers
    /// have an explicit, spec-named counterpart to `tree_new`.
    ///
    /// Like the rest of this crate's lifecycle, this assumes the precondition
    /// that no other thread holds (or is blocked trying to acquire) any
    /// lock in the tree — the same precondition the teacher crate's own
    /// shutdown path relies on for its in-memory store.
    pub fn free(self) {
        log::debug!("tree_free");
    }

    fn is_valid(&self, path: &str) -> bool {
        is_path_valid(path, self.config.max_folder_name_length)
    }

    /// List the names of the children of `path`.
    ///
    /// Returns `None` if the path is invalid or doesn't exist; otherwise a
    /// newline-joined listing (order unspecified).
    pub fn list(&self, path: &str) -> Option<String> {
        if !self.is_valid(path) {
            log::trace!("list: invalid path {path}");
            return None;
        }
        let chain = read_lock_path(&self.root, path)?;
        // SAFETY: `chain`'s target is read-locked for as long as `chain` lives
        let contents = unsafe { chain.target().children() }.contents_string();
        log::trace!("list: {path} -> {} entries", contents.lines().count());
        Some(contents)
    }

    /// Create a new, empty folder at `path`.
    pub fn create(&self, path: &str) -> TreeResult<()> {
        if !self.is_valid(path) {
            return Err(TreeError::Invalid);
        }
        if path == ROOT {
            return Err(TreeError::AlreadyExists);
        }
        let (parent_path, name) =
            make_path_to_parent(path).expect("non-root path always has a parent");
        let chain =
            read_write_lock_path(&self.root, parent_path).ok_or(TreeError::NotFound)?;
        let parent = chain.target();
        // SAFETY: `parent` is write-locked by `chain`
        if unsafe { parent.children() }.get(name).is_some() {
            return Err(TreeError::AlreadyExists);
        }
        let child = Node::new_child(self.config.child_capacity_hint, parent);
        // SAFETY: `parent` is write-locked by `chain`
        unsafe { parent.children_mut() }.insert(name.to_string(), child);
        log::debug!("create: {path}");
        Ok(())
    }

    /// Remove the (empty) folder at `path`.
    pub fn remove(&self, path: &str) -> TreeResult<()> {
        if !self.is_valid(path) {
            return Err(TreeError::Invalid);
        }
        let (parent_path, name) = match make_path_to_parent(path) {
            Some(x) => x,
            None => return Err(TreeError::Busy),
        };
        let chain =
            read_write_lock_path(&self.root, parent_path).ok_or(TreeError::NotFound)?;
        let parent = chain.target();
        // SAFETY: `parent` is write-locked by `chain`
        let victim = unsafe { parent.children() }.get(name).cloned().ok_or(TreeError::NotFound)?;
        // `parent`'s write-lock guarantees no new traverser can enter
        // `victim` while we wait for the in-flight ones to drain
        victim.lock.subtree_wait();
        // SAFETY: quiescent per `subtree_wait` above, and unreachable by any
        // other thread since `parent` (the only path to `victim`) is
        // write-locked
        if !unsafe { victim.children() }.is_empty() {
            return Err(TreeError::NotEmpty);
        }
        // SAFETY: `parent` is write-locked by `chain`
        unsafe { parent.children_mut() }.remove(name);
        log::debug!("remove: {path}");
        Ok(())
    }

    /// Move (rename/relocate) the folder at `source` to `target`.
    pub fn mv(&self, source: &str, target: &str) -> TreeResult<()> {
        if !self.is_valid(source) || !self.is_valid(target) {
            return Err(TreeError::Invalid);
        }
        if source == ROOT {
            return Err(TreeError::Busy);
        }
        if target == ROOT {
            return Err(TreeError::AlreadyExists);
        }
        // target strictly above source: moving source out through/into an
        // ancestor-relative position that would make it its own ancestor
        if is_strict_ancestor(target, source) {
            return Err(TreeError::Successor);
        }
        if source == target {
            return match read_lock_path(&self.root, source) {
                Some(_chain) => Ok(()),
                None => Err(TreeError::NotFound),
            };
        }
        // moving source into its own subtree
        if is_strict_ancestor(source, target) {
            return match read_lock_path(&self.root, target) {
                Some(_chain) => Err(TreeError::AlreadyExists),
                None => Err(TreeError::NotFound),
            };
        }

        let (sp, sn) = make_path_to_parent(source).expect("non-root source has a parent");
        let (tp, tn) = make_path_to_parent(target).expect("non-root target has a parent");
        let lcp_path = longest_common_prefix(sp, tp);

        let lcp_chain = read_write_lock_path(&self.root, lcp_path).ok_or(TreeError::NotFound)?;
        let lcp = lcp_chain.target().clone();

        let source_chain = if sp == lcp_path {
            None
        } else {
            let relative = &sp[lcp_path.len() - 1..];
            Some(read_write_lock_path_excluding(&lcp, relative).ok_or(TreeError::NotFound)?)
        };
        let source_parent = source_chain
            .as_ref()
            .map(|c| c.target().clone())
            .unwrap_or_else(|| lcp.clone());

        // SAFETY: `source_parent` is write-locked, either directly (`lcp`)
        // or via `source_chain`
        let source_node = unsafe { source_parent.children() }
            .get(sn)
            .cloned()
            .ok_or(TreeError::NotFound)?;
        // drain any in-flight traverser inside `source_node` before we
        // reparent it; `source_parent`'s write-lock keeps new ones out
        source_node.lock.subtree_wait();

        let target_chain = if tp == lcp_path {
            None
        } else {
            let relative = &tp[lcp_path.len() - 1..];
            Some(read_write_lock_path_excluding(&lcp, relative).ok_or(TreeError::NotFound)?)
        };
        let target_parent = target_chain
            .as_ref()
            .map(|c| c.target().clone())
            .unwrap_or_else(|| lcp.clone());

        // SAFETY: `target_parent` is write-locked, either directly (`lcp`)
        // or via `target_chain`
        if unsafe { target_parent.children() }.get(tn).is_some() {
            return Err(TreeError::AlreadyExists);
        }

        // SAFETY: both parents write-locked; `source_node` quiescent per
        // the `subtree_wait` above, so relinking it is race-free
        unsafe { source_parent.children_mut() }.remove(sn);
        unsafe { target_parent.children_mut() }.insert(tn.to_string(), source_node.clone());
        source_node.set_parent(&target_parent);

        log::debug!("mv: {source} -> {target}");
        Ok(())
        // `target_chain`, `source_chain` and `lcp_chain` drop here in
        // reverse declaration order, releasing target-side, then
        // source-side, then the lcp and its own ancestors — always after
        // both descents have released, as required by SPEC_FULL.md §4.6
    }
}
