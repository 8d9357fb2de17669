//! Type-safe pool identifier.
//!
//! Pool identifiers cannot be confused with [`super::AccountId`]s: a pool's
//! custody account and the pool itself carry distinct IDs and types.

use super::uuid_id::uuid_id;

uuid_id! {
    /// Unique identifier for a lottery pool instance.
    ///
    /// Generated once when the contract is deployed. Used as the key in
    /// [`super::PoolRegistry`], as the event discriminator, and as the
    /// WebSocket subscription target.
    PoolId
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_distinct_and_hashable() {
        let ids: HashSet<PoolId> = (0..32).map(|_| PoolId::new()).collect();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn round_trips_through_uuid_and_json() {
        let uuid = uuid::Uuid::new_v4();
        let Ok(id) = serde_json::from_str::<PoolId>(&format!("\"{uuid}\"")) else {
            panic!("deserialization failed");
        };
        assert_eq!(id, PoolId::from(uuid));
        assert_eq!(uuid::Uuid::from(id), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn parse_rejects_account_style_garbage() {
        assert!("pool-1".parse::<PoolId>().is_err());
    }
}
