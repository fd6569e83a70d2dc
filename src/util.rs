use std::time::Duration;

/// Suspends the caller between poll ticks and before delayed navigation.
///
/// Injected so tests can observe the cadence without waiting on a real clock.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread; the session is single-threaded so this is the
/// only suspension point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Render `count` with the singular or plural noun.
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
