//! Structured identifier candidates
//!
//! A candidate renders as `prefix + org id + suffix`, the suffix
//! zero-padded to a fixed width, e.g. `LI42` + `000317` = `LI42000317`.
//! Incrementing past the width simply adds a digit.

use std::fmt;

use crate::error::{OrderpickError, Result};
use crate::model::OrgId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierCandidate {
    prefix: String,
    org_id: OrgId,
    suffix: u64,
    width: u32,
}

impl IdentifierCandidate {
    pub fn new(prefix: impl Into<String>, org_id: OrgId, suffix: u64, width: u32) -> Self {
        IdentifierCandidate {
            prefix: prefix.into(),
            org_id,
            suffix,
            width,
        }
    }

    /// Read a rendered identifier back into its parts
    pub fn parse(value: &str, prefix: &str, org_id: &OrgId, width: u32) -> Result<Self> {
        let head = format!("{}{}", prefix, org_id);
        let digits = value
            .strip_prefix(head.as_str())
            .ok_or_else(|| OrderpickError::invalid_value("identifier", value))?;

        if digits.len() < width as usize || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderpickError::invalid_value("identifier", value));
        }
        let suffix = digits
            .parse::<u64>()
            .map_err(|_| OrderpickError::invalid_value("identifier", value))?;

        Ok(Self::new(prefix, org_id.clone(), suffix, width))
    }

    pub fn suffix(&self) -> u64 {
        self.suffix
    }

    /// The candidate after this one
    pub fn next(&self) -> Self {
        IdentifierCandidate {
            suffix: self.suffix.saturating_add(1),
            ..self.clone()
        }
    }
}

impl fmt::Display for IdentifierCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{:0width$}",
            self.prefix,
            self.org_id,
            self.suffix,
            width = self.width as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pads_suffix() {
        let candidate = IdentifierCandidate::new("LI", OrgId::from("42"), 317, 6);
        assert_eq!(candidate.to_string(), "LI42000317");
    }

    #[test]
    fn test_next_increments_by_one() {
        let candidate = IdentifierCandidate::new("LI", OrgId::from("42"), 999_998, 6);
        assert_eq!(candidate.next().to_string(), "LI42999999");
        assert_eq!(candidate.next().next().to_string(), "LI421000000");
    }

    #[test]
    fn test_parse_round_trips() {
        let org = OrgId::from("42");
        let parsed = IdentifierCandidate::parse("LI42000317", "LI", &org, 6).unwrap();
        assert_eq!(parsed.suffix(), 317);
        assert_eq!(parsed.to_string(), "LI42000317");
    }

    #[test]
    fn test_parse_rejects_foreign_values() {
        let org = OrgId::from("42");
        assert!(IdentifierCandidate::parse("LI7000317", "LI", &org, 6).is_err());
        assert!(IdentifierCandidate::parse("LI420003x7", "LI", &org, 6).is_err());
        assert!(IdentifierCandidate::parse("LI42317", "LI", &org, 6).is_err());
    }
}
