pub mod io;
pub mod models;
pub mod options;
pub mod parsing;
pub mod pipeline;

// Re-export key types for easier usage
pub use io::*;
pub use models::*;
pub use options::ParserOptions;
pub use pipeline::{GeneratedProject, Parser, detect_structure, parse_response};
