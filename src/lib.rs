//! Campus Market - Student Marketplace Core
//!
//! This crate implements the persistence-facing core of a student
//! marketplace: the seller rating ledger and the per-listing chat store,
//! both backed by a pluggable document store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
