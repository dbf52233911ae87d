mod compare;
mod error;
mod exec;
mod lookup;
mod matcher;
mod record;
mod store;

pub use compare::compare_values;
pub use error::StoreError;
pub use exec::{apply_find_options, get_path, project};
pub use lookup::Lookup;
pub use matcher::{CmpOp, Predicate};
pub use record::{CREATED_AT, ID, apply_update, parse_id, prepare_new};
pub use store::Store;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

#[cfg(feature = "redb")]
mod redb_store;

#[cfg(feature = "redb")]
pub use redb_store::RedbStore;
