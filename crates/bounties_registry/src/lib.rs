//! Escrowed bounty registry.
//!
//! An issuer deposits funds against a task description and a deadline.
//! Other accounts submit fulfillments until the deadline passes. The issuer
//! either accepts exactly one fulfillment, paying the deposit to its
//! fulfiller, or cancels the bounty and gets the deposit back. Each
//! committed transition is appended to an [`EventLog`] that subscribers can
//! replay from any offset.

mod board;
pub mod clock;
mod error;
pub mod events;
mod ledger;
mod models;
mod registry;

pub use board::{ApplyOutcome, BountyBoard, BountyListing};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BountyError, Result};
pub use events::{BountyEvent, EventLog, EventRecord, Subscription};
pub use ledger::{Ledger, Transfer, TransferKind};
pub use models::{Amount, Bounty, BountyId, BountyStatus, Fulfillment, FulfillmentId, Identity};
pub use registry::BountyRegistry;
