use crate::params;
use crate::platform::User;

/// Human readable label of the session bound to `user`.
///
/// Prefers the display name, then the email. Users with neither are labeled
/// [`params::LABEL_ANONYMOUS`] when anonymous and [`params::LABEL_CUSTOM`]
/// otherwise. Empty strings count as missing.
pub fn session_label(user: &User) -> String {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

    non_empty(&user.display_name)
        .or_else(|| non_empty(&user.email))
        .unwrap_or_else(|| {
            if user.is_anonymous {
                params::LABEL_ANONYMOUS.to_owned()
            } else {
                params::LABEL_CUSTOM.to_owned()
            }
        })
}
