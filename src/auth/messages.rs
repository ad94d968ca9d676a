//! Auth error code to human message mapping.
//!
//! Remote-auth failures carry provider-style error codes. The UI shows a
//! fixed human-readable message per known code; an unrecognized code falls
//! back to a generic message that still includes the raw code so support
//! can diagnose it.

/// Human-readable message for a known auth error code, if any.
pub fn known_message(code: &str) -> Option<&'static str> {
    let message = match code {
        "auth/wrong-password" => "Incorrect password. Please try again.",
        "auth/user-not-found" => "No account found with this email.",
        "auth/email-already-in-use" => "An account already exists for this email.",
        "auth/invalid-email" => "That email address is not valid.",
        "auth/weak-password" => "Password must be at least 8 characters.",
        "auth/too-many-requests" => "Too many attempts. Please wait and try again.",
        "auth/invalid-verification-code" => "The verification code is incorrect.",
        "auth/code-expired" => "The verification code has expired. Request a new one.",
        "auth/invalid-credential" => "The sign-in credential is invalid or has expired.",
        "auth/network-request-failed" => "Network error. Check your connection and retry.",
        _ => return None,
    };
    Some(message)
}

/// Message for any code, falling back to a generic line with the raw code.
pub fn human_message(code: &str) -> String {
    match known_message(code) {
        Some(message) => message.to_string(),
        None => format!("Authentication failed ({})", code),
    }
}
