//! Travel destination discovery backend.
//!
//! Listings ("places") are browsed with filter, sort and offset pagination;
//! signed-in users review and save them, admins curate visibility and create
//! new ones. Storage sits behind the traits in [`store`], with a MySQL
//! implementation for deployments and an in-memory one for local runs and tests.

pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
