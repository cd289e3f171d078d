use zeroize::Zeroizing;
use zkv_sui_types::{derive_keypair, Keypair};

use crate::ConfigError;

/// Secret text that is wiped from memory when dropped.
pub type SecretString = Zeroizing<String>;

/// Derives the signing keypair from the operator secret.
pub fn keypair_from_secret(secret: Option<&SecretString>) -> Result<Keypair, ConfigError> {
    let secret = secret.ok_or(ConfigError::MissingSecret)?;
    Ok(derive_keypair(secret)?)
}
