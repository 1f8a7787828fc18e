/// Password strength rules accepted at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PasswordPolicy {
    /// At least one ASCII letter, one ASCII digit and one character that is neither.
    #[default]
    LettersDigitsSymbols,
}

impl PasswordPolicy {
    pub fn accepts(&self, password: &str) -> bool {
        match self {
            PasswordPolicy::LettersDigitsSymbols => {
                let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
                let has_digit = password.chars().any(|c| c.is_ascii_digit());
                let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

                has_letter && has_digit && has_symbol
            }
        }
    }
}

pub fn check_password_strength(password: &str) -> bool {
    PasswordPolicy::default().accepts(password)
}
