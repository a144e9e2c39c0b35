/*
 * Created on Mon Feb 12 2024
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

/// The default bound on a single folder name's length, in bytes
pub const DEFAULT_MAX_FOLDER_NAME_LENGTH: usize = 255;
/// The default initial capacity hint for a freshly created node's child map
pub const DEFAULT_CHILD_CAPACITY_HINT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Knobs for a [`Tree`](crate::Tree) instance
///
/// Everything here only affects validation/allocation behavior; it never
/// changes the concurrency protocol itself
pub struct TreeConfig {
    /// the maximum length, in bytes, of a single path component
    pub max_folder_name_length: usize,
    /// how many slots to reserve upfront in a new node's child map
    pub child_capacity_hint: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_folder_name_length: DEFAULT_MAX_FOLDER_NAME_LENGTH,
            child_capacity_hint: DEFAULT_CHILD_CAPACITY_HINT,
        }
    }
}
