//! Validated Twitch login names.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const LOGIN_MAX_LEN: usize = 25;

/// Error returned when a username can never be a Twitch login.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum LoginError {
	/// The username was empty or whitespace.
	#[error("Username cannot be empty.")]
	Empty,
	/// The username exceeded the maximum login length.
	#[error("Username exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
	/// The username contains a character Twitch never issues in logins.
	#[error("Username contains an invalid character: {found:?}.")]
	InvalidCharacter {
		/// First offending character.
		found: char,
	},
}

/// Twitch login, trimmed and lowercased.
///
/// Twitch matches `login=` case-insensitively, so normalizing here keeps logs and error bodies
/// stable regardless of how the frontend capitalized the name.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);
impl Login {
	/// Validates and normalizes a raw username.
	pub fn new(value: impl AsRef<str>) -> Result<Self, LoginError> {
		let view = value.as_ref().trim();

		if view.is_empty() {
			return Err(LoginError::Empty);
		}
		if let Some(found) = view.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
			return Err(LoginError::InvalidCharacter { found });
		}
		if view.len() > LOGIN_MAX_LEN {
			return Err(LoginError::TooLong { max: LOGIN_MAX_LEN });
		}

		Ok(Self(view.to_ascii_lowercase()))
	}
}
impl Deref for Login {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Login {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Login> for String {
	fn from(value: Login) -> Self {
		value.0
	}
}
impl TryFrom<String> for Login {
	type Error = LoginError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for Login {
	type Err = LoginError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for Login {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Login({})", self.0)
	}
}
impl Display for Login {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
