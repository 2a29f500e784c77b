pub mod file;
pub mod logging;
pub mod naming;

pub use file::{ensure_directory_exists, safe_move_file, unique_destination};
pub use logging::init_logging;
pub use naming::{clean_name, sanitize_xml_text};
