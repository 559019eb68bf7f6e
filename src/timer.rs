use crate::state::AppState;
use crate::types::PollId;
use std::sync::Arc;
use std::time::Duration;

/// Spawn the deadline task for a freshly opened poll.
///
/// After the time limit it funnels into the same idempotent close as an
/// explicit request. A poll that was closed or superseded in the meantime
/// is not the current one anymore, so a late firing finds nothing to do and
/// the race between expiry and manual close settles to exactly one
/// finalization.
pub fn spawn_close_timer(state: Arc<AppState>, poll_id: PollId, time_limit_seconds: u32) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(u64::from(time_limit_seconds))).await;
        state.close_expired(&poll_id).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ServerMessage;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    async fn presenter(state: &Arc<AppState>, id: &str) -> UnboundedReceiver<ServerMessage> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.attach(&id.to_string(), tx).await;
        state.join_presenter(&id.to_string()).await;
        while rx.try_recv().is_ok() {}
        rx
    }

    fn count_closed(rx: &mut UnboundedReceiver<ServerMessage>) -> usize {
        let mut closed = 0;
        while let Ok(msg) = rx.try_recv() {
            if matches!(msg, ServerMessage::PollClosed { .. }) {
                closed += 1;
            }
        }
        closed
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_closes_the_poll() {
        let state = Arc::new(AppState::new());
        let mut host_rx = presenter(&state, "host").await;

        let info = state
            .open_poll(
                &"host".to_string(),
                "Color?",
                &["Red".to_string(), "Blue".to_string()],
                30,
            )
            .await
            .unwrap()
            .unwrap();
        spawn_close_timer(state.clone(), info.id.clone(), info.time_limit_seconds);

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(state.active_poll().await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(state.active_poll().await.is_none());
        assert_eq!(state.history().await.len(), 1);
        assert_eq!(count_closed(&mut host_rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_close_beats_deadline_without_a_second_close() {
        let state = Arc::new(AppState::new());
        let mut host_rx = presenter(&state, "host").await;

        let info = state
            .open_poll(
                &"host".to_string(),
                "Color?",
                &["Red".to_string(), "Blue".to_string()],
                30,
            )
            .await
            .unwrap()
            .unwrap();
        spawn_close_timer(state.clone(), info.id.clone(), info.time_limit_seconds);

        state.close_poll(&"host".to_string()).await;

        // Let the deadline come and go; the poll is long closed.
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(state.history().await.len(), 1);
        assert_eq!(count_closed(&mut host_rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_touch_the_next_poll() {
        let state = Arc::new(AppState::new());
        let _host_rx = presenter(&state, "host").await;

        let first = state
            .open_poll(
                &"host".to_string(),
                "First?",
                &["A".to_string(), "B".to_string()],
                30,
            )
            .await
            .unwrap()
            .unwrap();
        spawn_close_timer(state.clone(), first.id.clone(), first.time_limit_seconds);

        // Supersede immediately with a much longer poll.
        let second = state
            .open_poll(
                &"host".to_string(),
                "Second?",
                &["C".to_string(), "D".to_string()],
                300,
            )
            .await
            .unwrap()
            .unwrap();
        spawn_close_timer(state.clone(), second.id.clone(), second.time_limit_seconds);

        // First poll's deadline passes; the second poll must stay open.
        tokio::time::sleep(Duration::from_secs(60)).await;
        let active = state.active_poll().await.unwrap();
        assert_eq!(active.id, second.id);
        assert_eq!(state.history().await.len(), 1);
    }
}
