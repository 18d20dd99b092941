use std::fmt;

/// The shared TOTP secret, as configured.
///
/// Captured once at startup and never mutated. `Debug` is redacted and there
/// is no `Display`, so the value cannot end up in a log line by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps the configured text, or `None` when it is empty or blank.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }

        Some(Self(text))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::Secret;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_text_is_no_secret(#[case] text: &str) {
        assert_eq!(Secret::new(text), None);
    }

    #[test]
    fn debug_never_shows_the_value() {
        let secret = Secret::new("JBSWY3DPEHPK3PXP").unwrap();
        let rendered = format!("{secret:?}");

        assert!(!rendered.contains("JBSWY3DPEHPK3PXP"));
        assert_eq!(rendered, "Secret(**redacted**)");
    }

    #[test]
    fn keeps_text_as_given() {
        let secret = Secret::new(" jbsw y3dp ").unwrap();
        assert_eq!(secret.expose(), " jbsw y3dp ");
    }
}
