//! Ledger account identity.
//!
//! [`AccountId`] identifies every holder of value on the ledger: players,
//! operators, and the custody account each pool contract owns. The contract
//! never authenticates identities; it only compares them for equality.

use super::uuid_id::uuid_id;

uuid_id! {
    /// Identity of a ledger account.
    ///
    /// Assigned by the ledger when the account is opened.
    AccountId
}

impl AccountId {
    /// Raw bytes, used when hashing identities into block data.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(AccountId::new(), AccountId::new());
    }

    #[test]
    fn parses_its_own_display() {
        let id = AccountId::new();
        let Ok(parsed) = id.to_string().parse::<AccountId>() else {
            panic!("display output should parse");
        };
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-an-account".parse::<AccountId>().is_err());
    }

    #[test]
    fn serializes_as_bare_uuid_string() {
        let uuid = uuid::Uuid::new_v4();
        let json = serde_json::to_string(&AccountId::from_uuid(uuid)).unwrap_or_default();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn bytes_match_inner_uuid() {
        let id = AccountId::new();
        assert_eq!(id.as_bytes(), id.as_uuid().as_bytes());
    }
}
