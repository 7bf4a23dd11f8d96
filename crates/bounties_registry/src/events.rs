//! Append-only log of committed registry transitions.
//!
//! Readers never hold a reference into the registry's live state: they keep
//! an offset into the log and replay from it, so any number of subscribers
//! can follow along from genesis or from an arbitrary point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Amount, BountyId, FulfillmentId, Identity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BountyEvent {
    BountyIssued {
        bounty_id: BountyId,
        issuer: Identity,
        amount: Amount,
    },
    BountyFulfilled {
        bounty_id: BountyId,
        fulfiller: Identity,
        fulfillment_id: FulfillmentId,
    },
    FulfillmentAccepted {
        bounty_id: BountyId,
        issuer: Identity,
        fulfiller: Identity,
        fulfillment_id: FulfillmentId,
        amount: Amount,
    },
    BountyCancelled {
        bounty_id: BountyId,
        issuer: Identity,
        amount: Amount,
    },
}

impl BountyEvent {
    pub fn bounty_id(&self) -> BountyId {
        match self {
            BountyEvent::BountyIssued { bounty_id, .. }
            | BountyEvent::BountyFulfilled { bounty_id, .. }
            | BountyEvent::FulfillmentAccepted { bounty_id, .. }
            | BountyEvent::BountyCancelled { bounty_id, .. } => *bounty_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BountyEvent::BountyIssued { .. } => "BountyIssued",
            BountyEvent::BountyFulfilled { .. } => "BountyFulfilled",
            BountyEvent::FulfillmentAccepted { .. } => "FulfillmentAccepted",
            BountyEvent::BountyCancelled { .. } => "BountyCancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Commit position, starting at 0
    pub offset: u64,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: BountyEvent,
}

#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub(crate) fn append(&mut self, at: DateTime<Utc>, event: BountyEvent) {
        let offset = self.records.len() as u64;
        self.records.push(EventRecord { offset, at, event });
    }

    /// Records at or after `offset`, in commit order
    pub fn since(&self, offset: u64) -> &[EventRecord] {
        usize::try_from(offset)
            .ok()
            .and_then(|start| self.records.get(start..))
            .unwrap_or(&[])
    }

    pub fn len(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription::from_offset(0)
    }

    /// Subscription that only sees records committed from now on
    pub fn subscribe_latest(&self) -> Subscription {
        Subscription::from_offset(self.len())
    }
}

/// Read cursor into an [`EventLog`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    next: u64,
}

impl Subscription {
    pub fn from_offset(offset: u64) -> Self {
        Subscription { next: offset }
    }

    /// Offset of the next record this subscription will deliver
    pub fn position(&self) -> u64 {
        self.next
    }

    pub(crate) fn seek(&mut self, offset: u64) {
        self.next = offset;
    }

    /// Returns every record not yet seen and moves past them.
    pub fn poll<'a>(&mut self, log: &'a EventLog) -> &'a [EventRecord] {
        let records = log.since(self.next);
        if let Some(last) = records.last() {
            self.next = last.offset + 1;
        }
        records
    }
}
