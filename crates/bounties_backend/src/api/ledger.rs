use axum::extract::{Json, Path, State};
use bounties_registry::Identity;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub identity: Identity,
    /// Total paid out or refunded to this identity. Serialized as a string
    /// since it can exceed what JSON numbers hold exactly.
    pub balance: String,
}

pub async fn balance(State(state): State<AppState>, Path(identity): Path<String>) -> Json<Balance> {
    let identity = Identity::new(identity);
    let balance = state.registry.read().await.ledger().balance_of(&identity);

    Json(Balance {
        identity,
        balance: balance.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum::extract::{Json, Path, State};
    use bounties_registry::Identity;
    use chrono::{Duration, Utc};

    use super::balance;
    use crate::AppState;

    #[tokio::test]
    async fn refund_credits_issuer() {
        let state = AppState::default();
        {
            let mut registry = state.registry.write().await;
            let issuer = Identity::new("0xissuer");
            let deadline = Utc::now() + Duration::days(1);
            registry.issue(&issuer, "data", deadline, 42).unwrap();
            registry.cancel_bounty(&issuer, 0).unwrap();
        }

        let Json(res) = balance(State(state.clone()), Path("0xissuer".into())).await;
        assert_eq!(res.balance, "42");

        let Json(res) = balance(State(state), Path("0xnobody".into())).await;
        assert_eq!(res.balance, "0");
    }
}
