pub mod analyzers;
pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod gender;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod workbook;
