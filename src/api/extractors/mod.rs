//! Custom request extractors.

mod valid_path;
mod validated_json;

pub use valid_path::ValidPath;
pub use validated_json::ValidatedJson;
