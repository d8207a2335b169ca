//! DrConnect Storage
//!
//! This module provides profile persistence:
//!
//! - **types**: Core data structures (PatientProfile, Gender)
//! - **backend**: The key-value storage area (memory and file implementations)
//! - **profile_store**: One profile per identifying key on top of a storage area
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use drconnect::storage::{FileStorage, ProfileStore};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileStorage::open("./drconnect_data", None)?);
//!     let store = ProfileStore::new(storage);
//!
//!     match store.load("a@x.com") {
//!         Some(profile) => println!("Welcome, {}", profile.full_name()),
//!         None => println!("No profile found for a@x.com"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod profile_store;
pub mod types;

// Re-export commonly used types
pub use backend::{FileStorage, KeyValueStorage, MemoryStorage, STORAGE_FILE_NAME};
pub use error::{StorageError, StorageResult};
pub use profile_store::{
    profile_key, ProfileStore, ANONYMOUS_KEY, CURRENT_USER_KEY, PROFILE_KEY_PREFIX,
};
pub use types::{Gender, PatientProfile};
