pub mod config;
pub mod lock_file;
pub mod path_processing;

pub use config::{ConfigError, GeneratorConfig};
pub use lock_file::{LOCK_FILE_NAME, find_lock_file, parse_lock_versions, read_lock_versions};
pub use path_processing::{expand_tilde, find_project_root, resolve_against};
