//! # Signflow CLI
//!
//! Administrative utilities used by the `signflow-cli` binary: seeding the
//! menu catalog and printing a role's permission matrix in the terminal.
//!
//! ```ignore
//! use signflow_cli::seeder::seed_menus;
//!
//! let summary = seed_menus(&pool).await?;
//! println!("{} modules, {} items", summary.modules, summary.items);
//! ```

pub mod seeder;
pub mod table;
