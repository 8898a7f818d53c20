//! Plugin-based engineering calculation toolbox.
//!
//! The [`plugin`] module owns discovery, the descriptor registry and the
//! lifecycle of tool instances; [`tools`] holds the calculation tools compiled
//! into the toolbox.

pub mod model;
pub mod plugin;
pub mod tools;
