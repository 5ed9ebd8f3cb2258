pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{format_item, parse_item, Item, Store};
