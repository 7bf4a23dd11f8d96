use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::{
    clock::{Clock, SystemClock},
    error::{BountyError, Result},
    events::{BountyEvent, EventLog},
    ledger::{Ledger, TransferKind},
    models::{Amount, Bounty, BountyId, BountyStatus, Fulfillment, FulfillmentId, Identity},
};

/// Store and state machine for bounties.
///
/// Every operation either commits completely (record change, fund movement
/// and one event) or fails before touching anything. Callers that share a
/// registry between threads must serialize access themselves, every
/// mutating method takes `&mut self`.
#[derive(Debug)]
pub struct BountyRegistry<C = SystemClock> {
    clock: C,
    bounties: Vec<Bounty>,
    ledger: Ledger,
    events: EventLog,
}

impl BountyRegistry<SystemClock> {
    pub fn new() -> Self {
        BountyRegistry::with_clock(SystemClock)
    }
}

impl Default for BountyRegistry<SystemClock> {
    fn default() -> Self {
        BountyRegistry::new()
    }
}

fn rejected<'a>(
    op: &'static str,
    caller: &'a Identity,
) -> impl FnOnce(BountyError) -> BountyError + 'a {
    move |err| {
        debug!("{op} by {caller} rejected: {err}");
        err
    }
}

impl<C: Clock> BountyRegistry<C> {
    pub fn with_clock(clock: C) -> Self {
        BountyRegistry {
            clock,
            bounties: Vec::new(),
            ledger: Ledger::default(),
            events: EventLog::default(),
        }
    }

    /// Open a new bounty funded with `amount`, returns its id.
    pub fn issue(
        &mut self,
        caller: &Identity,
        data: impl Into<String>,
        deadline: DateTime<Utc>,
        amount: Amount,
    ) -> Result<BountyId> {
        let now = self.clock.now();
        Self::check_issue(now, deadline, amount).map_err(rejected("issue", caller))?;

        let bounty_id = self.bounties.len() as BountyId;
        self.bounties.push(Bounty {
            id: bounty_id,
            issuer: caller.clone(),
            data: data.into(),
            deadline,
            amount,
            status: BountyStatus::Open,
            created: now,
            fulfillments: Vec::new(),
        });
        self.ledger.deposit(amount);
        self.events.append(
            now,
            BountyEvent::BountyIssued {
                bounty_id,
                issuer: caller.clone(),
                amount,
            },
        );

        info!("bounty {bounty_id} issued by {caller} for {amount}");
        Ok(bounty_id)
    }

    fn check_issue(now: DateTime<Utc>, deadline: DateTime<Utc>, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(BountyError::InvalidAmount);
        }
        if deadline <= now {
            return Err(BountyError::InvalidDeadline);
        }
        Ok(())
    }

    /// Submit a claim of completion against an open bounty.
    pub fn fulfill(
        &mut self,
        caller: &Identity,
        bounty_id: BountyId,
        data: impl Into<String>,
    ) -> Result<FulfillmentId> {
        let now = self.clock.now();
        self.check_fulfill(now, caller, bounty_id)
            .map_err(rejected("fulfill", caller))?;

        let bounty = self.bounty_mut(bounty_id)?;
        let fulfillment_id = bounty.fulfillments.len() as FulfillmentId;
        bounty.fulfillments.push(Fulfillment {
            id: fulfillment_id,
            fulfiller: caller.clone(),
            data: data.into(),
            accepted: false,
            submitted: now,
        });
        self.events.append(
            now,
            BountyEvent::BountyFulfilled {
                bounty_id,
                fulfiller: caller.clone(),
                fulfillment_id,
            },
        );

        info!("bounty {bounty_id} fulfilled by {caller} as fulfillment {fulfillment_id}");
        Ok(fulfillment_id)
    }

    fn check_fulfill(
        &self,
        now: DateTime<Utc>,
        caller: &Identity,
        bounty_id: BountyId,
    ) -> Result<()> {
        let bounty = self.bounty(bounty_id)?;
        if bounty.issuer == *caller {
            return Err(BountyError::IssuerCannotFulfillOwnBounty);
        }
        if !bounty.is_open() || bounty.is_expired(now) {
            return Err(BountyError::BountyNotOpen);
        }
        Ok(())
    }

    /// Accept one fulfillment and pay the deposit to its fulfiller.
    pub fn accept_fulfillment(
        &mut self,
        caller: &Identity,
        bounty_id: BountyId,
        fulfillment_id: FulfillmentId,
    ) -> Result<()> {
        let now = self.clock.now();
        self.check_accept(caller, bounty_id, fulfillment_id)
            .map_err(rejected("accept", caller))?;

        let bounty = self.bounty_mut(bounty_id)?;
        let index =
            usize::try_from(fulfillment_id).map_err(|_| BountyError::FulfillmentNotFound)?;
        let fulfillment = bounty
            .fulfillments
            .get_mut(index)
            .ok_or(BountyError::FulfillmentNotFound)?;
        fulfillment.accepted = true;
        let fulfiller = fulfillment.fulfiller.clone();
        let amount = std::mem::take(&mut bounty.amount);
        bounty.status = BountyStatus::Accepted;
        let issuer = bounty.issuer.clone();

        self.ledger
            .release(bounty_id, &fulfiller, amount, TransferKind::Payout);
        self.events.append(
            now,
            BountyEvent::FulfillmentAccepted {
                bounty_id,
                issuer,
                fulfiller: fulfiller.clone(),
                fulfillment_id,
                amount,
            },
        );

        info!(
            "bounty {bounty_id} accepted fulfillment {fulfillment_id}, paid {amount} to {fulfiller}"
        );
        Ok(())
    }

    fn check_accept(
        &self,
        caller: &Identity,
        bounty_id: BountyId,
        fulfillment_id: FulfillmentId,
    ) -> Result<()> {
        let bounty = self.bounty(bounty_id)?;
        if bounty.issuer != *caller {
            return Err(BountyError::NotIssuer);
        }
        if !bounty.is_open() {
            return Err(BountyError::BountyNotOpen);
        }
        if bounty.fulfillment(fulfillment_id).is_none() {
            return Err(BountyError::FulfillmentNotFound);
        }
        Ok(())
    }

    /// Withdraw an open bounty and refund the deposit to its issuer.
    pub fn cancel_bounty(&mut self, caller: &Identity, bounty_id: BountyId) -> Result<()> {
        let now = self.clock.now();
        self.check_cancel(caller, bounty_id)
            .map_err(rejected("cancel", caller))?;

        let bounty = self.bounty_mut(bounty_id)?;
        let amount = std::mem::take(&mut bounty.amount);
        bounty.status = BountyStatus::Cancelled;
        let issuer = bounty.issuer.clone();

        self.ledger
            .release(bounty_id, &issuer, amount, TransferKind::Refund);
        self.events.append(
            now,
            BountyEvent::BountyCancelled {
                bounty_id,
                issuer,
                amount,
            },
        );

        info!("bounty {bounty_id} cancelled, refunded {amount} to {caller}");
        Ok(())
    }

    fn check_cancel(&self, caller: &Identity, bounty_id: BountyId) -> Result<()> {
        let bounty = self.bounty(bounty_id)?;
        if bounty.issuer != *caller {
            return Err(BountyError::NotIssuer);
        }
        if !bounty.is_open() {
            return Err(BountyError::BountyNotOpen);
        }
        Ok(())
    }

    pub fn bounty(&self, bounty_id: BountyId) -> Result<&Bounty> {
        usize::try_from(bounty_id)
            .ok()
            .and_then(|index| self.bounties.get(index))
            .ok_or(BountyError::BountyNotFound)
    }

    fn bounty_mut(&mut self, bounty_id: BountyId) -> Result<&mut Bounty> {
        usize::try_from(bounty_id)
            .ok()
            .and_then(|index| self.bounties.get_mut(index))
            .ok_or(BountyError::BountyNotFound)
    }

    pub fn fulfillment(
        &self,
        bounty_id: BountyId,
        fulfillment_id: FulfillmentId,
    ) -> Result<&Fulfillment> {
        self.bounty(bounty_id)?
            .fulfillment(fulfillment_id)
            .ok_or(BountyError::FulfillmentNotFound)
    }

    /// All bounties in id order, closed ones included
    pub fn bounties(&self) -> impl Iterator<Item = &Bounty> {
        self.bounties.iter()
    }

    pub fn bounty_count(&self) -> u64 {
        self.bounties.len() as u64
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
