//! Core library for the catalog-tools command line application.
//!
//! The library downloads the catalog category menu, flattens each root block
//! into a table and exports the tables as one workbook. HTTP and Excel
//! adapters live under [`catalog::tools::io`], data representations inside
//! [`catalog::tools::model`], the tree walk in [`catalog::tools::flatten`],
//! the filter-facet lookups in [`catalog::tools::enrich`], and the run
//! orchestration under [`catalog::tools::pipeline`].

pub mod catalog;

pub use catalog::tools::{
    Result, ToolError, config, enrich, error, flatten, io, model, pipeline, roots, workbook,
};
