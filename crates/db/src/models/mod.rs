//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches
//!
//! Joined read shapes (a product with its categories, an image with its
//! product summary) live next to the entity they are centred on.

pub mod category;
pub mod product;
pub mod product_details;
pub mod product_image;
