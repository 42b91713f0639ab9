//! Rename poll: after the first exchange on a `新对话` session the backend
//! renames it asynchronously, so the session list is re-fetched on a timer
//! until the new name shows up.

use std::future::Future;
use std::time::Duration;

use pchat_core::api::{ApiClient, ApiResult};
use pchat_types::Session;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::{PollUiEvent, UiEvent};
use crate::runtime::inbox::UiEventSender;

/// Runs the poll loop, forwarding every fetched list to the inbox.
pub async fn rename_poll(
    client: ApiClient,
    session_id: String,
    interval: Duration,
    max_attempts: u32,
    cancel: Option<CancellationToken>,
    tx: UiEventSender,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    let renamed = poll_for_rename(
        &session_id,
        interval,
        max_attempts,
        &cancel,
        || client.list_sessions(),
        |attempt, sessions| {
            let _ = tx.send(UiEvent::Poll(PollUiEvent::Cycle {
                session_id: session_id.clone(),
                attempt,
                sessions,
            }));
        },
    )
    .await;
    UiEvent::Poll(PollUiEvent::Finished {
        session_id,
        renamed,
    })
}

/// Waits `interval`, fetches, and repeats until `session_id` no longer has
/// the default name, `max_attempts` cycles have run, or `cancel` fires.
///
/// Every successful fetch goes to `on_cycle`. A failed fetch counts as an
/// attempt. Returns true when the rename was observed.
pub async fn poll_for_rename<F, Fut, C>(
    session_id: &str,
    interval: Duration,
    max_attempts: u32,
    cancel: &CancellationToken,
    mut fetch: F,
    mut on_cycle: C,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<Vec<Session>>>,
    C: FnMut(u32, Vec<Session>),
{
    for attempt in 1..=max_attempts {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(session_id, attempt, "rename poll cancelled");
                return false;
            }
            () = tokio::time::sleep(interval) => {}
        }

        match fetch().await {
            Ok(sessions) => {
                let renamed = sessions
                    .iter()
                    .any(|s| s.id == session_id && !s.has_default_name());
                on_cycle(attempt, sessions);
                if renamed {
                    return true;
                }
            }
            Err(error) => warn!(session_id, attempt, %error, "rename poll fetch failed"),
        }
    }
    debug!(session_id, max_attempts, "rename poll gave up");
    false
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pchat_core::api::ApiError;

    use super::*;

    fn list(name: &str) -> Vec<Session> {
        vec![Session {
            id: "s1".to_string(),
            name: name.to_string(),
            ..Default::default()
        }]
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_the_cycle_that_sees_the_rename() {
        let fetches = Cell::new(0u32);
        let mut cycles = Vec::new();
        let renamed = poll_for_rename(
            "s1",
            Duration::from_secs(3),
            10,
            &CancellationToken::new(),
            || {
                fetches.set(fetches.get() + 1);
                let name = if fetches.get() >= 2 { "东京旅行" } else { "新对话" };
                std::future::ready(Ok(list(name)))
            },
            |attempt, _| cycles.push(attempt),
        )
        .await;

        assert!(renamed);
        assert_eq!(fetches.get(), 2);
        assert_eq!(cycles, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let fetches = Cell::new(0u32);
        let renamed = poll_for_rename(
            "s1",
            Duration::from_secs(3),
            10,
            &CancellationToken::new(),
            || {
                fetches.set(fetches.get() + 1);
                std::future::ready(Ok(list("新对话")))
            },
            |_, _| {},
        )
        .await;

        assert!(!renamed);
        assert_eq!(fetches.get(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_counts_as_attempt() {
        let fetches = Cell::new(0u32);
        let renamed = poll_for_rename(
            "s1",
            Duration::from_secs(3),
            3,
            &CancellationToken::new(),
            || {
                fetches.set(fetches.get() + 1);
                std::future::ready(Err(ApiError::network("connection refused")))
            },
            |_, _| {},
        )
        .await;

        assert!(!renamed);
        assert_eq!(fetches.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_before_next_fetch() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let fetches = Cell::new(0u32);
        let renamed = poll_for_rename(
            "s1",
            Duration::from_secs(3),
            10,
            &cancel,
            || {
                fetches.set(fetches.get() + 1);
                std::future::ready(Ok(list("东京旅行")))
            },
            |_, _| {},
        )
        .await;

        assert!(!renamed);
        assert_eq!(fetches.get(), 0);
    }
}
