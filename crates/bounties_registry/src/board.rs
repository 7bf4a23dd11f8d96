//! Display list of bounties, built purely from the event log.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    events::{BountyEvent, EventLog, EventRecord, Subscription},
    models::{Amount, BountyId, BountyStatus, Identity},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BountyListing {
    pub bounty_id: BountyId,
    pub issuer: Identity,
    /// Amount the bounty was issued with
    pub amount: Amount,
    pub status: BountyStatus,
    pub fulfillments: u64,
    /// Fulfiller that got paid, once accepted
    pub winner: Option<Identity>,
}

/// Result of handing a single record to [`BountyBoard::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Record was already folded in
    Duplicate,
    /// Record is ahead of the board; earlier records are still missing
    Gap,
}

#[derive(Debug, Default)]
pub struct BountyBoard {
    listings: BTreeMap<BountyId, BountyListing>,
    cursor: Subscription,
}

impl BountyBoard {
    pub fn new() -> Self {
        BountyBoard::default()
    }

    /// Build a board from every record in `log`
    pub fn replay(log: &EventLog) -> Self {
        let mut board = BountyBoard::new();
        board.catch_up(log);
        board
    }

    /// Fold in records committed since the last call, returns how many.
    pub fn catch_up(&mut self, log: &EventLog) -> usize {
        let records = self.cursor.poll(log);
        for record in records {
            self.fold(&record.event);
        }
        records.len()
    }

    /// Fold in a single delivered record. Only the record at the board's
    /// position is applied, anything else leaves the board untouched.
    pub fn apply(&mut self, record: &EventRecord) -> ApplyOutcome {
        let position = self.cursor.position();
        if record.offset < position {
            return ApplyOutcome::Duplicate;
        }
        if record.offset > position {
            return ApplyOutcome::Gap;
        }
        self.fold(&record.event);
        self.cursor.seek(position + 1);
        ApplyOutcome::Applied
    }

    /// Offset of the next record the board expects
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn fold(&mut self, event: &BountyEvent) {
        match event {
            BountyEvent::BountyIssued {
                bounty_id,
                issuer,
                amount,
            } => {
                self.listings.insert(
                    *bounty_id,
                    BountyListing {
                        bounty_id: *bounty_id,
                        issuer: issuer.clone(),
                        amount: *amount,
                        status: BountyStatus::Open,
                        fulfillments: 0,
                        winner: None,
                    },
                );
            }
            BountyEvent::BountyFulfilled { bounty_id, .. } => {
                if let Some(listing) = self.listings.get_mut(bounty_id) {
                    listing.fulfillments += 1;
                }
            }
            BountyEvent::FulfillmentAccepted {
                bounty_id,
                fulfiller,
                ..
            } => {
                if let Some(listing) = self.listings.get_mut(bounty_id) {
                    listing.status = BountyStatus::Accepted;
                    listing.winner = Some(fulfiller.clone());
                }
            }
            BountyEvent::BountyCancelled { bounty_id, .. } => {
                if let Some(listing) = self.listings.get_mut(bounty_id) {
                    listing.status = BountyStatus::Cancelled;
                }
            }
        }
    }

    pub fn get(&self, bounty_id: BountyId) -> Option<&BountyListing> {
        self.listings.get(&bounty_id)
    }

    pub fn listings(&self) -> impl Iterator<Item = &BountyListing> {
        self.listings.values()
    }

    pub fn open(&self) -> impl Iterator<Item = &BountyListing> {
        self.listings
            .values()
            .filter(|l| l.status == BountyStatus::Open)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
