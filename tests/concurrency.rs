/*
 * Created on Sun Feb 18 2024
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

//! Many threads hammering a shared [`Tree`] with randomized `create`,
//! `remove`, `mv` and `list` calls over a small, fixed path alphabet. There's
//! no oracle that predicts which operation "should" win a given race — that's
//! the whole point of exposing the tree concurrently — so what's actually
//! checked is the two things that threaded code can get wrong without any
//! single operation itself being incorrect: deadlock (every round must finish
//! inside the timeout) and a corrupted tree (every surviving path, read back
//! single-threaded once the workers are done, must still satisfy the
//! parent/child invariants the sequential tests already check one operation
//! at a time).

use foldertree::{Tree, TreeError};
use rand::Rng;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;
const ROUNDS_PER_THREAD: usize = 400;
const NAMES: &[&str] = &["a", "b", "c", "d"];

fn random_path(rng: &mut impl Rng, depth: usize) -> String {
    let mut path = String::from("/");
    for _ in 0..depth {
        path.push_str(NAMES[rng.gen_range(0..NAMES.len())]);
        path.push('/');
    }
    path
}

/// Run `f` in the background and fail the test if it doesn't return within
/// `dur` — a hang here means two or more operations deadlocked on each
/// other's lock chains.
fn panic_on_timeout<F: FnOnce() + Send + 'static>(dur: Duration, f: F) {
    let (tx, rx) = mpsc::channel::<()>();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(dur)
        .expect("operation did not complete in time; likely deadlocked");
}

#[test]
fn concurrent_mixed_workload_never_deadlocks_or_corrupts() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = Arc::new(Tree::new());

    panic_on_timeout(Duration::from_secs(30), {
        let tree = tree.clone();
        move || {
            let handles: Vec<_> = (0..THREADS)
                .map(|seed| {
                    let tree = tree.clone();
                    thread::spawn(move || {
                        let mut rng = rand::rngs::mock::StepRng::new(seed as u64, 2654435761);
                        for _ in 0..ROUNDS_PER_THREAD {
                            let depth = 1 + (rng.gen_range(0..3));
                            let path = random_path(&mut rng, depth);
                            match rng.gen_range(0u8..4) {
                                0 => {
                                    let _ = tree.create(&path);
                                }
                                1 => {
                                    let _ = tree.remove(&path);
                                }
                                2 => {
                                    let other = random_path(&mut rng, depth);
                                    let _ = tree.mv(&path, &other);
                                }
                                _ => {
                                    let _ = tree.list(&path);
                                }
                            }
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().expect("worker thread panicked");
            }
        }
    });

    // the tree must still be fully usable and internally consistent: every
    // name reachable from root must itself be listable, and removing
    // whatever's left must succeed bottom-up without ever returning a code
    // other than the ones `remove` documents.
    fn drain(tree: &Tree, path: &str) {
        let listing = tree.list(path).expect("path reachable from a prior list must still exist");
        for name in listing.lines() {
            let child_path = format!("{path}{name}/");
            drain(tree, &child_path);
        }
        if path != "/" {
            match tree.remove(path) {
                Ok(()) | Err(TreeError::NotFound) => {}
                Err(other) => panic!("unexpected remove error during drain: {other:?}"),
            }
        }
    }
    drain(&tree, "/");
    assert_eq!(tree.list("/"), Some(String::new()));
}

#[test]
fn concurrent_creates_of_the_same_name_exactly_one_wins() {
    let tree = Arc::new(Tree::new());
    let successes = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    panic_on_timeout(Duration::from_secs(10), {
        let tree = tree.clone();
        let successes = successes.clone();
        move || {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let tree = tree.clone();
                    let successes = successes.clone();
                    thread::spawn(move || {
                        if tree.create("/contested/").is_ok() {
                            successes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
        }
    });

    assert_eq!(successes.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(tree.list("/").unwrap(), "contested");
}

#[test]
fn concurrent_moves_preserve_every_node_exactly_once() {
    let tree = Arc::new(Tree::new());
    tree.create("/src/").unwrap();
    for name in NAMES {
        tree.create(&format!("/src/{name}/")).unwrap();
    }
    tree.create("/dst/").unwrap();

    panic_on_timeout(Duration::from_secs(10), {
        let tree = tree.clone();
        move || {
            let handles: Vec<_> = NAMES
                .iter()
                .map(|name| {
                    let tree = tree.clone();
                    let name = *name;
                    thread::spawn(move || {
                        tree.mv(&format!("/src/{name}/"), &format!("/dst/{name}/")).unwrap();
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
        }
    });

    let mut moved = tree.list("/dst/").unwrap().lines().collect::<Vec<_>>();
    moved.sort();
    assert_eq!(moved, NAMES);
    assert_eq!(tree.list("/src/"), Some(String::new()));
}
