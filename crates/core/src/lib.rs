//! Domain types shared by the catalog database and API crates.

pub mod error;
pub mod image_store;
pub mod pagination;
pub mod product_id;
pub mod types;
