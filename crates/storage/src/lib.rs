pub mod store;

pub use store::{CategoryStore, CategoryStoreError, LoadedCategories, StoreError};
