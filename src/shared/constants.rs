/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ATTACHMENTS
// =============================================================================

/// Allowed MIME types for inspection attachments
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// Maximum size of a single uploaded file (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Longest original file name kept on an attachment (matches `documents.file_name`)
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// Maximum number of files accepted in one inspection submission
pub const MAX_FILES_PER_SUBMISSION: usize = 50;

/// Reported as `fieldName` when an attachment carries no field-name metadata
pub const UNKNOWN_FIELD_NAME: &str = "unknown";

/// Check if a MIME type is allowed
pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}
