//! Keygen command implementation.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::path::PathBuf;

pub fn run(private: PathBuf, public: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if private.exists() {
        return Err(format!("Refusing to overwrite {}", private.display()).into());
    }
    let key = SigningKey::generate(&mut OsRng);
    let public_hex = hex::encode(key.verifying_key().to_bytes());

    std::fs::write(&private, format!("{}\n", hex::encode(key.to_bytes())))
        .map_err(|e| format!("Failed to write {}: {}", private.display(), e))?;
    std::fs::write(&public, format!("{}\n", public_hex))
        .map_err(|e| format!("Failed to write {}: {}", public.display(), e))?;

    println!("{}", public_hex);
    Ok(())
}
