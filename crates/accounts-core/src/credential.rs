//! Credential hashing policy.
//!
//! Two schemes are in use and the choice between them is keyed off the
//! user's role:
//!
//! | Scheme | Algorithm | Parameters | Salt |
//! |--------|-----------|------------|------|
//! | [`AdminCredentialScheme`] | bcrypt | cost 12, input at most 72 bytes | random, embedded in the output |
//! | [`StandardCredentialScheme`] | Argon2id | t=1, m=64 MiB, p=4, 32-byte digest | **fixed**, shared by every non-admin user |
//!
//! The fixed Argon2 salt is a known weakness. It is kept so that hashes
//! already stored by earlier deployments stay bit-compatible; two non-admin
//! users with the same password therefore share a hash.
//!
//! Which scheme produced a stored hash is not recorded anywhere except in
//! the encoding itself. [`choose_scheme`] is the single place that decides.

use argon2::{Algorithm, Argon2, Params, Version};

use crate::{Error, Result, user::ADMIN_ROLE};

pub const BCRYPT_COST: u32 = 12;

/// bcrypt only reads this many bytes of input; anything longer is refused
/// rather than silently truncated.
pub const BCRYPT_MAX_PASSWORD_LEN: usize = 72;

const ARGON2_SALT: &[u8] = b"unique_salt_per_user";
const ARGON2_M_COST: u32 = 64 * 1024;
const ARGON2_T_COST: u32 = 1;
const ARGON2_P_COST: u32 = 4;
const ARGON2_OUTPUT_LEN: usize = 32;

/// Prefix of every encoding produced by [`StandardCredentialScheme`].
pub const ARGON2_PREFIX: &str = "$argon2id$";

// ─── Capability ──────────────────────────────────────────────────────────────

/// Something that can turn a plaintext into a storable encoding and check a
/// plaintext against one.
pub trait CredentialHasher {
  fn hash(&self, plaintext: &str) -> Result<String>;

  /// `false` on mismatch or on an encoding this hasher does not understand.
  fn verify(&self, plaintext: &str, encoded: &str) -> bool;
}

/// bcrypt with a per-call random salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminCredentialScheme;

impl CredentialHasher for AdminCredentialScheme {
  fn hash(&self, plaintext: &str) -> Result<String> {
    if plaintext.len() > BCRYPT_MAX_PASSWORD_LEN {
      return Err(Error::HashingFailure(format!(
        "password length exceeds {BCRYPT_MAX_PASSWORD_LEN} bytes"
      )));
    }
    bcrypt::hash(plaintext, BCRYPT_COST).map_err(|e| Error::HashingFailure(e.to_string()))
  }

  fn verify(&self, plaintext: &str, encoded: &str) -> bool {
    bcrypt::verify(plaintext, encoded).unwrap_or(false)
  }
}

/// Argon2id over the fixed shared salt, rendered as
/// `$argon2id$v=19$m=65536,t=1,p=4$<hex digest>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCredentialScheme;

impl StandardCredentialScheme {
  fn digest(plaintext: &str) -> Result<[u8; ARGON2_OUTPUT_LEN]> {
    let params = Params::new(
      ARGON2_M_COST,
      ARGON2_T_COST,
      ARGON2_P_COST,
      Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| Error::HashingFailure(e.to_string()))?;

    let mut out = [0u8; ARGON2_OUTPUT_LEN];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
      .hash_password_into(plaintext.as_bytes(), ARGON2_SALT, &mut out)
      .map_err(|e| Error::HashingFailure(e.to_string()))?;
    Ok(out)
  }
}

impl CredentialHasher for StandardCredentialScheme {
  fn hash(&self, plaintext: &str) -> Result<String> {
    let digest = Self::digest(plaintext)?;
    Ok(format!(
      "{ARGON2_PREFIX}v=19$m={ARGON2_M_COST},t={ARGON2_T_COST},p={ARGON2_P_COST}${}",
      hex::encode(digest)
    ))
  }

  /// The salt is fixed, so verification is a re-derivation.
  fn verify(&self, plaintext: &str, encoded: &str) -> bool {
    encoded.starts_with(ARGON2_PREFIX)
      && self.hash(plaintext).is_ok_and(|candidate| candidate == encoded)
  }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// The tagged choice between the two schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScheme {
  Admin,
  Standard,
}

impl CredentialHasher for CredentialScheme {
  fn hash(&self, plaintext: &str) -> Result<String> {
    match self {
      Self::Admin => AdminCredentialScheme.hash(plaintext),
      Self::Standard => StandardCredentialScheme.hash(plaintext),
    }
  }

  fn verify(&self, plaintext: &str, encoded: &str) -> bool {
    match self {
      Self::Admin => AdminCredentialScheme.verify(plaintext, encoded),
      Self::Standard => StandardCredentialScheme.verify(plaintext, encoded),
    }
  }
}

/// The mutation a credential is being hashed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Create,
  Update,
}

/// Decide which scheme hashes a credential.
///
/// - On create only the requested role counts.
/// - On update the admin scheme wins if **either** the requested role or the
///   currently stored role is admin. A user being promoted and a user being
///   demoted both get bcrypt for the password supplied in the same request.
pub fn choose_scheme(
  existing_role:  Option<&str>,
  requested_role: &str,
  operation:      Operation,
) -> CredentialScheme {
  let requested_admin = requested_role == ADMIN_ROLE;
  let admin = match operation {
    Operation::Create => requested_admin,
    Operation::Update => requested_admin || existing_role == Some(ADMIN_ROLE),
  };

  if admin { CredentialScheme::Admin } else { CredentialScheme::Standard }
}

/// Hash `plaintext` for a new user with `role`.
pub fn hash(plaintext: &str, role: &str) -> Result<String> {
  choose_scheme(None, role, Operation::Create).hash(plaintext)
}

/// Run `scheme` on the blocking pool so a slow hash never stalls the runtime.
///
/// A panicked or cancelled hashing task is reported as a hashing failure.
pub async fn hash_blocking(scheme: CredentialScheme, plaintext: String) -> Result<String> {
  let hashed = tokio::task::spawn_blocking(move || scheme.hash(&plaintext))
    .await
    .map_err(|e| Error::HashingFailure(e.to_string()))?;

  hashed.inspect_err(|e| tracing::error!(error = %e, ?scheme, "credential hashing failed"))
}

/// Check `plaintext` against a bcrypt encoding.
///
/// Argon2 encodings are never verified through this path and always yield
/// `false`, as does any malformed input.
pub fn verify(plaintext: &str, encoded: &str) -> bool {
  AdminCredentialScheme.verify(plaintext, encoded)
}
