//! Read side for subscribers: the raw event log and the display list
//! materialized from it.

use axum::extract::{Json, Query, State};
use bounties_registry::{BountyBoard, BountyListing, EventRecord};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// First offset to return, 0 replays from genesis
    #[serde(default)]
    pub from: u64,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<EventRecord>> {
    let registry = state.registry.read().await;
    Json(registry.events().since(query.from).to_vec())
}

pub async fn board(State(state): State<AppState>) -> Json<Vec<BountyListing>> {
    let registry = state.registry.read().await;
    let board = BountyBoard::replay(registry.events());
    Json(board.listings().cloned().collect())
}

#[cfg(test)]
mod tests {
    use axum::extract::{Json, Query, State};
    use bounties_registry::{BountyEvent, BountyStatus, Identity};
    use chrono::{Duration, Utc};

    use super::*;

    async fn seeded() -> AppState {
        let state = AppState::default();
        {
            let mut registry = state.registry.write().await;
            let issuer = Identity::new("0xissuer");
            let deadline = Utc::now() + Duration::days(2);
            registry.issue(&issuer, "first", deadline, 10).unwrap();
            registry.issue(&issuer, "second", deadline, 20).unwrap();
            registry.cancel_bounty(&issuer, 0).unwrap();
        }
        state
    }

    #[tokio::test]
    async fn events_from_offset() {
        let state = seeded().await;

        let Json(all) = list(State(state.clone()), Query(EventsQuery::default())).await;
        assert_eq!(all.len(), 3);

        let Json(tail) = list(State(state.clone()), Query(EventsQuery { from: 2 })).await;
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].offset, 2);
        assert!(matches!(
            tail[0].event,
            BountyEvent::BountyCancelled { bounty_id: 0, .. }
        ));

        let Json(none) = list(State(state), Query(EventsQuery { from: 9 })).await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn board_lists_every_bounty() {
        let state = seeded().await;

        let Json(listings) = board(State(state)).await;
        let statuses: Vec<_> = listings.iter().map(|l| (l.bounty_id, l.status)).collect();
        assert_eq!(
            statuses,
            vec![(0, BountyStatus::Cancelled), (1, BountyStatus::Open)]
        );
        assert_eq!(listings[1].amount, 20);
    }
}
