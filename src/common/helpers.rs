// Helper functions for safe logging and avatar file handling

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Public path of a profile page. Usernames are stored raw and may contain
/// characters that are not wire-legal in a Location header, so the path is
/// percent-encoded.
pub fn profile_path(username: &str) -> String {
    format!("/{}", urlencoding::encode(username))
}

/// Extracts a supported image extension from an uploaded filename
pub fn image_extension_from_filename(filename: &str) -> Option<&str> {
    filename
        .split('.')
        .last()
        .filter(|ext| matches!(*ext, "jpg" | "jpeg" | "png" | "gif" | "webp"))
}

/// Checks uploaded bytes against the supported avatar image formats
pub fn is_valid_image_type(data: &[u8]) -> bool {
    let infer = infer::Infer::new();
    if let Some(info) = infer.get(data) {
        matches!(
            info.mime_type(),
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" | "image/webp"
        )
    } else {
        false
    }
}

/// Maps an avatar filename extension to its Content-Type header value
pub fn content_type_from_extension(filename: &str) -> &'static str {
    match filename.split('.').last() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/jpeg",
    }
}
