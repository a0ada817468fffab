//! Core types and trait definitions for the Inkbook studio backend.
//!
//! This crate is free of HTTP and database dependencies. It holds the
//! domain records, the scheduling-conflict rule, the income-recognition
//! rules, and the [`store::StudioStore`] trait every backend implements.

// Native `async fn` in traits; the store trait spells out `Send` futures
// explicitly where it matters.
#![allow(async_fn_in_trait)]

pub mod appointment;
pub mod artist;
pub mod client;
pub mod error;
pub mod expense;
pub mod finance;
mod input;
pub mod money;
pub mod schedule;
pub mod store;

pub use error::{Entity, Error, Result};
pub use money::Money;
