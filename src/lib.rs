//! catsync - keeps i18next translation catalogs in sync with source code
//!
//! catsync scans a React source tree for `useTranslation` declarations and
//! the keys passed to the translation functions, and makes sure every key
//! has an entry in the catalog of every language. It can remove entries no
//! longer used and keep running to follow file changes.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, catalogs and synchronization
//! - `logging`: Diagnostic output setup

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
