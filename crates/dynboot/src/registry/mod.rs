//! Node Registry Module
//!
//! Retrieves the public list of Tox bootstrap nodes and turns its table markup
//! into [`ToxNode`](crate::ToxNode) records.
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────────────┐    GET     ┌──────────────────────────┐
//!   │    WikiRegistry      │───────────►│  wiki.tox.chat/users/... │
//!   │    (NodeSource)      │◄───────────│  <table> active nodes    │
//!   └──────────┬───────────┘    HTML    └──────────────────────────┘
//!              │
//!              ▼
//!   ┌──────────────────────┐
//!   │ parse_nodes(layout)  │  cells → rows of `layout.columns()` → ToxNode
//!   └──────────────────────┘
//! ```
//!
//! The page has used two incompatible table layouts over time. The layout in
//! effect is chosen explicitly through [`TableLayout`]; both are never tried.

mod client;
mod layout;
mod parse;

pub use client::{DEFAULT_REGISTRY_URL, NodeSource, StaticSource, WikiRegistry};
pub use layout::TableLayout;
pub use parse::{TABLE_END_MARKER, TABLE_START_MARKER, parse_nodes, split_cells};
