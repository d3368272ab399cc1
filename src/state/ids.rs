//! Identifiers for scorecards and userspaces.

use std::fmt;

use rand::Rng;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::state::scorecard::ScorecardError;

const SUFFIX_LEN: usize = 6;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const USERSPACE_ID_LEN: usize = 16;

/// Namespace key derived from a user-chosen passphrase. Not a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserspaceId(String);

impl UserspaceId {
    /// Derive the id deterministically from `passphrase`.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, ScorecardError> {
        let passphrase = passphrase.trim();
        if passphrase.is_empty() {
            return Err(ScorecardError::BlankPassphrase);
        }

        let digest = Sha256::digest(passphrase.as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(USERSPACE_ID_LEN);
        Ok(Self(id))
    }

    /// Hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a scorecard: `[{userspace}-]{unix_millis}-{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScorecardId(String);

impl ScorecardId {
    /// Allocate a fresh id, prefixed with the userspace when one is open.
    pub fn generate(userspace: Option<&UserspaceId>) -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let mut rng = rand::rng();
        let suffix = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
            .collect::<String>();

        let id = match userspace {
            Some(userspace) => format!("{userspace}-{millis}-{suffix}"),
            None => format!("{millis}-{suffix}"),
        };
        Self(id)
    }

    /// Validate an id read back from storage or a request path.
    pub fn parse(raw: &str) -> Result<Self, ScorecardError> {
        let invalid = || ScorecardError::InvalidId(raw.to_string());
        let parts = raw.split('-').collect::<Vec<_>>();
        let (prefix, millis, suffix) = match parts.as_slice() {
            [millis, suffix] => (None, *millis, *suffix),
            [prefix, millis, suffix] => (Some(*prefix), *millis, *suffix),
            _ => return Err(invalid()),
        };

        if let Some(prefix) = prefix {
            let valid_prefix = !prefix.is_empty()
                && prefix
                    .chars()
                    .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
            if !valid_prefix {
                return Err(invalid());
            }
        }
        if millis.is_empty() || !millis.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let valid_suffix = suffix.len() == SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !valid_suffix {
            return Err(invalid());
        }

        Ok(Self(raw.to_string()))
    }

    /// String form used in storage keys and paths.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScorecardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn userspace_id_is_deterministic() {
        let a = UserspaceId::from_passphrase("green fairway").unwrap();
        let b = UserspaceId::from_passphrase("  green fairway ").unwrap();
        let c = UserspaceId::from_passphrase("red fairway").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), USERSPACE_ID_LEN);
    }

    #[test]
    fn blank_passphrase_is_rejected() {
        assert!(UserspaceId::from_passphrase("  ").is_err());
    }

    #[test]
    fn generated_ids_parse_back() {
        let userspace = UserspaceId::from_passphrase("club").unwrap();
        let with_prefix = ScorecardId::generate(Some(&userspace));
        let without_prefix = ScorecardId::generate(None);

        assert!(with_prefix.as_str().starts_with(userspace.as_str()));
        assert_eq!(ScorecardId::parse(with_prefix.as_str()).unwrap(), with_prefix);
        assert_eq!(
            ScorecardId::parse(without_prefix.as_str()).unwrap(),
            without_prefix
        );
    }

    #[test]
    fn generated_ids_differ() {
        let a = ScorecardId::generate(None);
        let b = ScorecardId::generate(None);
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in [
            "",
            "abc",
            "1700000000000-abc",
            "1700000000000-ABCDEF",
            "17000x0000000-abcdef",
            "XYZ-1700000000000-abcdef",
            "a-b-c-d",
            "../1700000000000-abcdef",
        ] {
            assert!(ScorecardId::parse(raw).is_err(), "accepted `{raw}`");
        }
    }
}
