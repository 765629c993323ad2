//! Auth-domain models: validated logins, redacted secrets, client credentials, and app tokens.

pub mod credentials;
pub mod login;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use login::*;
pub use secret::*;
pub use token::*;
