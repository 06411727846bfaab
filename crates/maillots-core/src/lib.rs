//! # Maillots Core
//!
//! I/O-free logic for the maillots catalog: the entry model and its JSON
//! codec, natural model ordering, search ranking, tag formatting,
//! pagination, the persistence trait with its merge rules, and the catalog
//! service used by the HTTP API.
//!
//! This crate contains no tokio, filesystem or network code. Storage is
//! reached only through [`store::CatalogBackend`].

pub mod auth;
pub mod models;
pub mod natural;
pub mod paging;
pub mod search;
pub mod service;
pub mod store;
pub mod tags;
