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

//! An in-memory, concurrent, hierarchical folder tree.
//!
//! A [`Tree`] is a single root folder (`/`) that can contain any number of
//! nested folders. Any number of threads may call [`Tree::list`],
//! [`Tree::create`], [`Tree::remove`] and [`Tree::mv`] on the same tree at
//! once: every operation only ever locks the nodes along the path(s) it
//! touches, hand-over-hand, so unrelated subtrees never contend with each
//! other. See `SPEC_FULL.md` for the full protocol this crate implements.
//!
//! ```
//! use foldertree::Tree;
//!
//! let tree = Tree::new();
//! tree.create("/home/").unwrap();
//! tree.create("/home/user/").unwrap();
//! assert_eq!(tree.list("/home/").unwrap(), "user");
//! tree.mv("/home/user/", "/home/admin/").unwrap();
//! assert_eq!(tree.list("/home/").unwrap(), "admin");
//! ```

mod children;
mod config;
mod error;
mod locker;
mod node;
mod path;
mod sync;
mod tree;

pub use config::TreeConfig;
pub use error::{TreeError, TreeResult};
pub use tree::Tree;
