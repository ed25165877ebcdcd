pub mod config;
pub mod enrich;
pub mod error;
pub mod flatten;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod roots;
pub mod workbook;

pub use error::{Result, ToolError};
