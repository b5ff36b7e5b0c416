// Utilities module
// Helper functions and tools

pub mod paths;

pub use paths::{
    is_empty_dir, is_occupied, move_file, normalize_path, numbered_path, relative_to_root,
    resolve_path,
};
