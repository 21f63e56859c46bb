//! Mapping of serenity failures onto platform error kinds.

use roletools_error::{PlatformError, PlatformErrorKind};
use serenity::http::HttpError;

/// Classify a rejected REST request by status code.
///
/// # Examples
///
/// ```
/// use roletools_discord::classify_status;
/// use roletools_error::PlatformErrorKind;
///
/// assert!(matches!(classify_status(404, "Unknown Message"), PlatformErrorKind::NotFound(_)));
/// assert!(matches!(classify_status(403, "Missing Access"), PlatformErrorKind::Forbidden(_)));
/// ```
pub fn classify_status(status: u16, reason: impl Into<String>) -> PlatformErrorKind {
    let reason = reason.into();
    match status {
        404 => PlatformErrorKind::NotFound(reason),
        403 => PlatformErrorKind::Forbidden(reason),
        status => PlatformErrorKind::Http { status, reason },
    }
}

/// Convert a serenity error into a [`PlatformError`].
///
/// Rejected requests keep Discord's own message as the reason; everything
/// that never produced a response becomes `Transport`.
#[track_caller]
pub fn platform_error(err: serenity::Error) -> PlatformError {
    let kind = match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            classify_status(response.status_code.as_u16(), response.error.message.clone())
        }
        _ => PlatformErrorKind::Transport(err.to_string()),
    };
    PlatformError::new(kind)
}

/// Whether a serenity error is a confirmed 404.
pub(crate) fn is_not_found(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}
