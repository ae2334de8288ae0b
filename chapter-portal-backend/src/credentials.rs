use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng as _};
use sha2::{Digest as _, Sha256};

const SCHEME_PREFIX: &str = "sha256$";
const SALT_LENGTH: usize = 16;

pub(crate) fn random_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Produces `sha256$<salt>$<hex digest of salt followed by password>`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = random_token(SALT_LENGTH);
    let digest = digest(&salt, password);
    format!("{SCHEME_PREFIX}{salt}${digest}")
}

/// Checks `supplied` against a stored credential. Anything not in the salted digest
/// format is compared as clear text, which is how the seeded admin accounts are stored.
#[must_use]
pub fn verify_password(stored: &str, supplied: &str) -> bool {
    match stored
        .strip_prefix(SCHEME_PREFIX)
        .and_then(|rest| rest.split_once('$'))
    {
        Some((salt, expected)) => {
            constant_time_eq(digest(salt, supplied).as_bytes(), expected.as_bytes())
        }
        None => constant_time_eq(stored.as_bytes(), supplied.as_bytes()),
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0, |difference, (a, b)| difference | (a ^ b))
            == 0
}
