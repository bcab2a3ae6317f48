use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

/// Parameters of the visibility retry loop.
///
/// Sleep durations grow by backoff_multiplier per miss, capped at max_delay.
/// Jitter, when set, randomizes each sleep by the given +/- fraction so that
/// a burst of simultaneous signups does not re-poll in lockstep. Jitter
/// applies to the sleep, never to the stored delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
    pub max_delay: Duration,
    pub jitter: Option<f64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(2000),
            jitter: Some(0.2),
        }
    }
}

/// Why a visibility wait gave up.
#[derive(Debug, thiserror::Error)]
pub enum VisibilityError<E> {
    /// The retry budget ran out with the value still absent.
    #[error("value not visible after {attempts} attempts over {elapsed:?}")]
    Timeout { attempts: u32, elapsed: Duration },

    /// The caller-supplied deadline expired mid-wait.
    #[error("caller deadline expired while awaiting visibility")]
    DeadlineExceeded,

    /// The lookup itself failed; not a visibility miss.
    #[error("lookup failed: {0}")]
    Lookup(E),
}

/// Await an eventually-visible value through a bounded retry loop.
///
/// Calls `lookup` until it yields a present value, the policy's attempt
/// budget is exhausted, or `deadline` passes. The first lookup happens
/// immediately, so an already-propagated value costs no sleep at all.
/// Each subsequent sleep is bounded by the deadline, which keeps
/// cancellation prompt: the loop never keeps polling past the point the
/// caller gave up.
pub async fn await_visible<T, E, F, Fut>(
    mut lookup: F,
    policy: &RetryPolicy,
    deadline: Option<Instant>,
) -> Result<T, VisibilityError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let started = Instant::now();
    let mut delay = policy.initial_delay;

    for attempt in 1..=policy.max_attempts {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(VisibilityError::DeadlineExceeded);
        }

        match lookup().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => return Err(VisibilityError::Lookup(e)),
        }

        if attempt == policy.max_attempts {
            break;
        }

        let wake_at = Instant::now() + apply_jitter(delay, policy.jitter);
        match deadline {
            Some(d) if d <= wake_at => {
                tokio::time::sleep_until(d).await;
                return Err(VisibilityError::DeadlineExceeded);
            }
            _ => tokio::time::sleep_until(wake_at).await,
        }

        delay = next_delay(delay, policy);
    }

    Err(VisibilityError::Timeout {
        attempts: policy.max_attempts,
        elapsed: started.elapsed(),
    })
}

fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let scaled = current.as_secs_f64() * policy.backoff_multiplier;
    Duration::from_secs_f64(scaled).min(policy.max_delay)
}

fn apply_jitter(delay: Duration, jitter: Option<f64>) -> Duration {
    match jitter {
        Some(fraction) if fraction > 0.0 => {
            let spread = delay.as_secs_f64() * fraction;
            let offset = rand::rng().random_range(-spread..=spread);
            Duration::from_secs_f64((delay.as_secs_f64() + offset).max(0.0))
        }
        _ => delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn test_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(400),
            jitter: None,
        }
    }

    /// Lookup stub that returns absent for the first `misses` calls, then a
    /// value. Records the instant of every call.
    fn scripted_lookup(
        misses: u32,
    ) -> (
        impl FnMut() -> std::future::Ready<Result<Option<u32>, &'static str>>,
        Arc<AtomicU32>,
        Arc<Mutex<Vec<Instant>>>,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let instants = Arc::new(Mutex::new(Vec::new()));
        let calls_inner = calls.clone();
        let instants_inner = instants.clone();
        let lookup = move || {
            let n = calls_inner.fetch_add(1, Ordering::SeqCst) + 1;
            instants_inner.lock().unwrap().push(Instant::now());
            if n <= misses {
                std::future::ready(Ok(None))
            } else {
                std::future::ready(Ok(Some(n)))
            }
        };
        (lookup, calls, instants)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_path_returns_without_sleeping() {
        let (lookup, calls, _) = scripted_lookup(0);
        let before = Instant::now();

        let result = await_visible(lookup, &test_policy(5), None).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // No artificial delay when the value is already visible
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_attempt_after_k_misses() {
        let (lookup, calls, _) = scripted_lookup(3);

        let result = await_visible(lookup, &test_policy(10), None).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_are_non_decreasing_and_capped() {
        let (lookup, _, instants) = scripted_lookup(6);

        await_visible(lookup, &test_policy(10), None).await.unwrap();

        let instants = instants.lock().unwrap();
        let gaps: Vec<Duration> = instants.windows(2).map(|w| w[1] - w[0]).collect();

        // 50, 100, 200, 400, 400, 400 - doubling until the cap
        assert_eq!(gaps.len(), 6);
        for pair in gaps.windows(2) {
            assert!(pair[1] >= pair[0], "delays must be non-decreasing: {:?}", gaps);
        }
        assert_eq!(gaps[0], Duration::from_millis(50));
        assert_eq!(gaps[1], Duration::from_millis(100));
        assert_eq!(gaps[2], Duration::from_millis(200));
        assert_eq!(gaps[3], Duration::from_millis(400));
        assert_eq!(gaps[5], Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_exactly_max_attempts() {
        let (lookup, calls, _) = scripted_lookup(u32::MAX);

        let result = await_visible(lookup, &test_policy(5), None).await;

        match result {
            Err(VisibilityError::Timeout { attempts, elapsed }) => {
                assert_eq!(attempts, 5);
                // 4 sleeps: 50 + 100 + 200 + 400
                assert_eq!(elapsed, Duration::from_millis(750));
            }
            other => panic!("expected Timeout, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_promptly_mid_wait() {
        let (lookup, calls, _) = scripted_lookup(u32::MAX);
        let policy = RetryPolicy {
            max_attempts: 100,
            initial_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(60),
            jitter: None,
        };
        let started = Instant::now();
        let deadline = started + Duration::from_millis(120);

        let result = await_visible(lookup, &policy, Some(deadline)).await;

        assert!(matches!(result, Err(VisibilityError::DeadlineExceeded)));
        // The wait stops at the deadline, not at the end of the 10s sleep
        assert_eq!(Instant::now() - started, Duration::from_millis(120));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_expired_deadline_skips_lookup() {
        let (lookup, calls, _) = scripted_lookup(0);
        let deadline = Instant::now() - Duration::from_millis(1);

        let result = await_visible(lookup, &test_policy(5), Some(deadline)).await;

        assert!(matches!(result, Err(VisibilityError::DeadlineExceeded)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_error_is_not_a_timeout() {
        let mut first = true;
        let lookup = move || {
            let out: Result<Option<u32>, &'static str> = if first {
                first = false;
                Ok(None)
            } else {
                Err("connection refused")
            };
            std::future::ready(out)
        };

        let result = await_visible(lookup, &test_policy(5), None).await;

        match result {
            Err(VisibilityError::Lookup(e)) => assert_eq!(e, "connection refused"),
            other => panic!("expected Lookup error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_keeps_delays_within_fraction() {
        let policy = RetryPolicy {
            max_attempts: 6,
            initial_delay: Duration::from_millis(100),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_millis(100),
            jitter: Some(0.5),
        };
        let (lookup, _, instants) = scripted_lookup(u32::MAX);

        let _ = await_visible(lookup, &policy, None).await;

        let instants = instants.lock().unwrap();
        for w in instants.windows(2) {
            let gap = w[1] - w[0];
            assert!(gap >= Duration::from_millis(50), "gap too small: {:?}", gap);
            assert!(gap <= Duration::from_millis(150), "gap too large: {:?}", gap);
        }
    }
}
