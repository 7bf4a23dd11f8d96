use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Amount, BountyId, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Deposit paid to the accepted fulfiller
    Payout,
    /// Deposit returned to the issuer
    Refund,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub bounty_id: BountyId,
    pub to: Identity,
    pub amount: Amount,
    pub kind: TransferKind,
}

/// Escrow held by the registry.
///
/// Deposits stay here while their bounty is open. Closing a bounty moves the
/// whole deposit out in one transfer, credited to the recipient's balance.
#[derive(Debug, Default)]
pub struct Ledger {
    held: u128,
    balances: HashMap<Identity, u128>,
    transfers: Vec<Transfer>,
}

impl Ledger {
    pub(crate) fn deposit(&mut self, amount: Amount) {
        self.held += u128::from(amount);
    }

    pub(crate) fn release(
        &mut self,
        bounty_id: BountyId,
        to: &Identity,
        amount: Amount,
        kind: TransferKind,
    ) {
        // held always covers the deposit of an open bounty
        self.held = self.held.saturating_sub(u128::from(amount));
        *self.balances.entry(to.clone()).or_default() += u128::from(amount);
        self.transfers.push(Transfer {
            bounty_id,
            to: to.clone(),
            amount,
            kind,
        });
    }

    /// Sum of deposits of all open bounties
    pub fn total_held(&self) -> u128 {
        self.held
    }

    /// Everything paid out or refunded to `identity` so far
    pub fn balance_of(&self, identity: &Identity) -> u128 {
        self.balances.get(identity).copied().unwrap_or(0)
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn transfer_for(&self, bounty_id: BountyId) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.bounty_id == bounty_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_moves_deposit_to_recipient() {
        let mut ledger = Ledger::default();
        let hunter = Identity::new("0xhunter");

        ledger.deposit(500);
        ledger.deposit(250);
        assert_eq!(ledger.total_held(), 750);

        ledger.release(0, &hunter, 500, TransferKind::Payout);
        assert_eq!(ledger.total_held(), 250);
        assert_eq!(ledger.balance_of(&hunter), 500);
        assert_eq!(ledger.balance_of(&Identity::new("0xnobody")), 0);
        assert_eq!(
            ledger.transfer_for(0),
            Some(&Transfer {
                bounty_id: 0,
                to: hunter,
                amount: 500,
                kind: TransferKind::Payout,
            })
        );
        assert!(ledger.transfer_for(1).is_none());
    }

    #[test]
    fn balances_do_not_overflow_u64() {
        let mut ledger = Ledger::default();
        let hunter = Identity::new("0xhunter");

        ledger.deposit(u64::MAX);
        ledger.deposit(u64::MAX);
        ledger.release(0, &hunter, u64::MAX, TransferKind::Payout);
        ledger.release(1, &hunter, u64::MAX, TransferKind::Payout);

        assert_eq!(ledger.balance_of(&hunter), 2 * u128::from(u64::MAX));
        assert_eq!(ledger.total_held(), 0);
    }
}
