//! Database seeding for development and demos.

pub mod menus;

pub use menus::{DEFAULT_CATALOG, MenuSeedSummary, clear_menus, seed_menus};
