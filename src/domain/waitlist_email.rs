use validator::validate_email;

/// An address that passes the same check a browser applies to an
/// `<input type="email">` before letting the form submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEmail(String);

impl WaitlistEmail {
    pub fn parse(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        if validate_email(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!("{} is not a valid waitlist email", s))
        }
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
