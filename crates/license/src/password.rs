//! Passwort-Hashing mit Argon2id
//!
//! Anmeldedaten werden nie im Klartext gehalten; der Store speichert
//! ausschliesslich Argon2id-PHC-Strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::LizenzFehler;

/// Hasht ein Passwort mit Argon2id und zufaelligem Salt
pub fn passwort_hashen(passwort: &str) -> Result<String, LizenzFehler> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LizenzFehler::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> Result<bool, LizenzFehler> {
    let geparst = PasswordHash::new(hash)
        .map_err(|e| LizenzFehler::PasswortHashing(format!("Hash-Format ungueltig: {e}")))?;

    match Argon2::default().verify_password(passwort.as_bytes(), &geparst) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(LizenzFehler::PasswortHashing(e.to_string())),
    }
}
