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

//! # Errors
//!
//! The symbolic result codes returned by [`Tree`](crate::Tree)'s mutating
//! operations. `list` doesn't use this type: it signals absence with `None`
//! since there's nothing more specific to say.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors arising from a `create`, `remove` or `move` call
pub enum TreeError {
    /// The path failed syntactic validation
    Invalid,
    /// The target name is already occupied
    AlreadyExists,
    /// Some path component doesn't exist
    NotFound,
    /// `remove` was asked to remove a non-empty folder
    NotEmpty,
    /// `remove`/`move` was attempted on the root
    Busy,
    /// `move`'s target is a descendant of its source
    Successor,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Invalid => "invalid path",
            Self::AlreadyExists => "already exists",
            Self::NotFound => "not found",
            Self::NotEmpty => "not empty",
            Self::Busy => "busy",
            Self::Successor => "target is a successor of source",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for TreeError {}

/// The result type returned by every mutating [`Tree`](crate::Tree) operation
pub type TreeResult<T> = Result<T, TreeError>;
