//! forge
//!
//! The code hosting contract and its AtomGit implementation.
//!
//! # Architecture
//!
//! Hosts program against the [`CodeApi`] trait and the normalized entities
//! in `types`. The adapter in [`atomgit`] maps each operation onto the
//! provider's REST API and reshapes the responses.
//!
//! # Modules
//!
//! - `traits`: [`CodeApi`], [`ForgeError`], [`ResponseOptions`]
//! - `types`: normalized entities
//! - [`atomgit`]: the AtomGit adapter and its wire schemas
//! - [`blame`]: blame segment grouping
//! - [`content`]: blob content decoding
//!
//! # Example
//!
//! ```ignore
//! use atomgit_code_api::forge::{CodeApi, RepositoryModel};
//!
//! let repo = RepositoryModel::new("openharmony", "docs", "master", sha);
//! for entry in api.get_tree(&repo, "").await? {
//!     println!("{} {}", entry.kind, entry.path);
//! }
//! ```

pub mod atomgit;
pub mod blame;
pub mod content;
mod traits;
mod types;

pub use traits::*;
pub use types::*;
