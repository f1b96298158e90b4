//! # gem-core
//!
//! Plain data shared by every QueryGem crate:
//! - [`Schema`], [`Table`] and [`Column`] as read from engine metadata
//! - [`QueryResult`], [`ResultSet`] and [`CellValue`] as produced by execution
//! - The default editor text shown before and after a database loads

pub mod defaults;
pub mod results;
pub mod schema;

pub use results::{CellValue, QueryResult, ResultSet};
pub use schema::{Column, Schema, Table};
