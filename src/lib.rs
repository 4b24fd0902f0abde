pub mod config;
pub mod error;
pub mod format;
pub mod writer;


// Re-exports for convenience
pub use config::{
    Mode, WriterConfig, DEFAULT_BASENAME, DEFAULT_EXTENSION, DEFAULT_TIMESTAMP_FORMAT,
};
pub use error::WriterError;
pub use format::{format_args, render_value};
pub use writer::PaperbackWriter;
