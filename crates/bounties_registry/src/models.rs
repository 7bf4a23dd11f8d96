use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BountyId = u64;
pub type FulfillmentId = u64;
/// Value in the smallest currency unit
pub type Amount = u64;

/// Account that calls into the registry, usually a wallet address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Identity(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Identity::new(id)
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Identity(id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BountyStatus {
    Open,
    /// A fulfillment was accepted and the deposit paid out
    Accepted,
    /// The issuer withdrew the deposit
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    /// Position within the bounty's fulfillment list
    pub id: FulfillmentId,
    pub fulfiller: Identity,
    /// Submission payload, passed through untouched
    pub data: String,
    pub accepted: bool,
    pub submitted: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: BountyId,
    /// The account that funded this bounty
    pub issuer: Identity,
    /// Task description, passed through untouched
    pub data: String,
    /// Fulfillments are refused from this instant on
    pub deadline: DateTime<Utc>,
    /// Deposit still held in escrow, zero once paid out or refunded
    pub amount: Amount,
    pub status: BountyStatus,
    pub created: DateTime<Utc>,
    pub fulfillments: Vec<Fulfillment>,
}

impl Bounty {
    pub fn is_open(&self) -> bool {
        self.status == BountyStatus::Open
    }

    /// Expiry is never stored, it is derived from the deadline whenever needed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub fn fulfillment(&self, fulfillment_id: FulfillmentId) -> Option<&Fulfillment> {
        let index = usize::try_from(fulfillment_id).ok()?;
        self.fulfillments.get(index)
    }

    pub fn accepted_fulfillment(&self) -> Option<&Fulfillment> {
        self.fulfillments.iter().find(|f| f.accepted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn bounty() -> Bounty {
        let created = Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap();
        Bounty {
            id: 0,
            issuer: "0xissuer".into(),
            data: "data".into(),
            deadline: created + Duration::days(1),
            amount: 10,
            status: BountyStatus::Open,
            created,
            fulfillments: vec![Fulfillment {
                id: 0,
                fulfiller: "0xhunter".into(),
                data: "answer".into(),
                accepted: false,
                submitted: created,
            }],
        }
    }

    #[test]
    fn deadline_instant_counts_as_expired() {
        let bounty = bounty();
        assert!(!bounty.is_expired(bounty.deadline - Duration::seconds(1)));
        assert!(bounty.is_expired(bounty.deadline));
    }

    #[test]
    fn fulfillment_lookup_by_position() {
        let bounty = bounty();
        assert_eq!(bounty.fulfillment(0).map(|f| f.data.as_str()), Some("answer"));
        assert!(bounty.fulfillment(1).is_none());
        assert!(bounty.fulfillment(u64::MAX).is_none());
        assert!(bounty.accepted_fulfillment().is_none());
    }

    #[test]
    fn identity_serializes_as_plain_string() {
        let id = Identity::new("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""0x70997970C51812dc3A010C7d01b50e0d17dc79C8""#);
    }
}
