//! Auth-domain identifiers, scope sets, secrets, and the assertion signer.

pub mod assertion;
pub mod id;
pub mod scope;
pub mod secret;

pub use assertion::*;
pub use id::*;
pub use scope::*;
pub use secret::*;
