//! # Maillots Catalog
//!
//! Catalog manager for a gymnastics leotard ("maillot") collection.
//!
//! Model images dropped into a source directory are copied to the public
//! image directory and merged into a JSON catalog keyed by model number.
//! The catalog is served to the browser client over a small HTTP API, and
//! tags can be edited either through that API (password-gated) or locally
//! from the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌────────────────┐
//! │ source images│──▶│  ingest  │──▶│ maillots.json  │
//! └──────────────┘   └──────────┘   └───────┬────────┘
//!                                           │
//!                      ┌────────────────────┤
//!                      ▼                    ▼
//!                 ┌──────────┐        ┌──────────┐
//!                 │   CLI    │        │   HTTP   │
//!                 │(maillots)│        │  (axum)  │
//!                 └──────────┘        └──────────┘
//! ```
//!
//! Ordering, search ranking, tag formatting and the catalog service itself
//! live in the I/O-free `maillots-core` crate.
//!
//! ## Quick Start
//!
//! ```bash
//! maillots ingest               # copy images, update the catalog
//! maillots list                 # catalog in natural order
//! maillots search 12            # ranked search
//! maillots serve                # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`json_store`] | JSON file catalog backend |
//! | [`source_images`] | Source image discovery |
//! | [`ingest`] | Image ingestion |
//! | [`auth`] | Write password verification |
//! | [`server`] | HTTP API |
//! | [`browse`] | List, search and sample commands |
//! | [`edit`] | Local tag editing |

pub mod auth;
pub mod browse;
pub mod config;
pub mod edit;
pub mod ingest;
pub mod json_store;
pub mod server;
pub mod source_images;
