// Application constants

/// Prefix of the move log file name; a timestamp and `.txt` follow
pub const LOG_FILE_PREFIX: &str = "merge_log_";

/// Profile picked up from the working directory when `--profile` is not given
pub const DEFAULT_PROFILE_NAME: &str = "folder-merger.yaml";

/// Title shown in the progress view header
pub const APP_TITLE: &str = "Folder Merger";
