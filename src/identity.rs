//! Local user identity: generated default name and name validation.
//!
//! DESIGN
//! ======
//! The user name is an ephemeral, client-chosen display string. It has no
//! auth backing: ownership of a message is a plain string comparison, so two
//! clients typing the same name are indistinguishable.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use rand::Rng;

/// Prefix of generated default names.
pub const ANON_PREFIX: &str = "anon_";
/// Number of random characters appended to [`ANON_PREFIX`].
pub const ANON_SUFFIX_LEN: usize = 5;
/// Longest accepted name, counted in characters after trimming.
pub const MAX_USER_LEN: usize = 32;

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a default name such as `anon_x7Qb2`.
///
/// Cosmetic disambiguation only; not suitable as a secret.
#[must_use]
pub fn start_user<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut name = String::with_capacity(ANON_PREFIX.len() + ANON_SUFFIX_LEN);
    name.push_str(ANON_PREFIX);
    for _ in 0..ANON_SUFFIX_LEN {
        let idx = rng.random_range(0..SUFFIX_CHARSET.len());
        name.push(char::from(SUFFIX_CHARSET[idx]));
    }
    name
}

/// A name is valid when it is non-empty after trimming and at most
/// [`MAX_USER_LEN`] characters long.
#[must_use]
pub fn is_valid_user(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_USER_LEN
}

/// The editable name field: last entered name plus its validity.
///
/// Every edit stores the trimmed value and revalidates it. An invalid name is
/// kept (so the user can keep editing) but disables sending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserField {
    name: String,
    valid: bool,
}

impl UserField {
    /// Start from a given name, validating it.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let mut field = Self { name: String::new(), valid: false };
        field.set(raw);
        field
    }

    /// Start from a freshly generated `anon_XXXXX` name.
    #[must_use]
    pub fn generated() -> Self {
        Self::new(&start_user(&mut rand::rng()))
    }

    /// Replace the name and revalidate. Returns the new validity.
    pub fn set(&mut self, raw: &str) -> bool {
        self.name = raw.trim().to_owned();
        self.valid = is_valid_user(raw);
        self.valid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
