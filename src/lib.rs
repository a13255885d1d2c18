//! Small persistent key-value store mirrored to a single JSON file.
//!
//! The whole dataset lives in memory; every mutation rewrites the file
//! before it returns. Batches of writes go through
//! [`JsonKv::transaction`], which commits all of them with one write or
//! none of them at all.
//!
//! ```rust,no_run
//! use json_kv::JsonKv;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let db = JsonKv::<User>::open("data/users.json").unwrap();
//! db.set("user:1", User { name: "Alice".into(), age: 30 }).unwrap();
//! assert_eq!(db.get("user:1").map(|u| u.age), Some(30));
//! ```
//!
//! One process, one store per file. Nothing locks the file against other
//! processes, and a second store opened on the same path keeps its own
//! in-memory copy, so the last writer's full map wins on disk.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod persist;
pub mod store;
pub mod transaction;

pub use codec::{Codec, JsonCodec};
pub use error::{Error, Result};
pub use store::{JsonKv, JsonKvBuilder};
pub use transaction::Transaction;
