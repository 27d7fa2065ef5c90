use email_address::EmailAddress;

pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_PASSWORD_CHARS: usize = 512;
pub const MAX_TITLE_CHARS: usize = 256;

/// rejects control characters anywhere and whitespace at either end
pub fn check_control_leading_trailing<G>(given: G, max_chars: Option<usize>) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.starts_with(char::is_whitespace) || given_ref.ends_with(char::is_whitespace) {
        return false;
    }

    let mut char_count = 0;

    for ch in given_ref.chars() {
        if ch.is_control() {
            return false;
        }

        char_count += 1;
    }

    max_chars.map_or(true, |max| char_count <= max)
}

/// rejects control characters and whitespace anywhere
pub fn check_control_whitespace<G>(given: G, max_chars: Option<usize>) -> bool
where
    G: AsRef<str>
{
    let mut char_count = 0;

    for ch in given.as_ref().chars() {
        if ch.is_control() || ch.is_whitespace() {
            return false;
        }

        char_count += 1;
    }

    max_chars.map_or(true, |max| char_count <= max)
}

pub fn email_valid(given: &str) -> bool {
    check_control_whitespace(given, Some(MAX_EMAIL_CHARS))
        && EmailAddress::is_valid(given)
}

/// passwords are opaque to the client, only emptiness and size are checked
pub fn password_valid(given: &str) -> bool {
    !given.is_empty() && given.chars().count() <= MAX_PASSWORD_CHARS
}

pub fn title_valid(given: &str) -> bool {
    !given.is_empty() && check_control_leading_trailing(given, Some(MAX_TITLE_CHARS))
}
