/*
 * Created on Wed Feb 14 2024
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

//! # The child map
//!
//! A plain, non-thread-safe name → node mapping. Every [`Node`](crate::node::Node)
//! owns exactly one of these; it is never accessed without the owning
//! node's read or write lock already held, so it has no synchronization of
//! its own.

use crate::node::Node;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct ChildMap {
    inner: HashMap<String, Arc<Node>>,
}

impl ChildMap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(capacity),
        }
    }
    pub(crate) fn get(&self, name: &str) -> Option<&Arc<Node>> {
        self.inner.get(name)
    }
    pub(crate) fn insert(&mut self, name: String, node: Arc<Node>) {
        self.inner.insert(name, node);
    }
    pub(crate) fn remove(&mut self, name: &str) -> Option<Arc<Node>> {
        self.inner.remove(name)
    }
    pub(crate) fn size(&self) -> usize {
        self.inner.len()
    }
    pub(crate) fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    pub(crate) fn contents_string(&self) -> String {
        crate::path::make_map_contents_string(self.inner.keys().map(|k| k.as_str()))
    }
}
