//! #  Database management and control.
//!
//! This module defines the interface contracts of the product engine database *backends*.
//!
//! * [`ProductManagement`] defines the storage operations for products: insert, fetch, list, partial update, stock
//!   update and delete.
//! * [`IdentityManagement`] defines lookups of login identities, and provisioning of new ones.
//!
//! Backends only report what is (or is not) in the store. Turning a missing record into a "not found" error, and
//! enforcing domain rules, is the job of the public API types in [`crate::api`].
mod identity_management;
mod product_management;

pub use identity_management::IdentityManagement;
pub use product_management::ProductManagement;
