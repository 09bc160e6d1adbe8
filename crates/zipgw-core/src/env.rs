//! Environment abstraction: the only place the core touches the clock or
//! entropy.
//!
//! State machines take time as a parameter and never sleep; only the
//! driver loop awaits. Implementing this trait is what lets the harness
//! run the exact same client under virtual time with a seeded RNG.

use std::time::{Duration, Instant};

use rand::RngCore;

/// Time and entropy provider for the driver loop.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current time. Must be monotonic within one execution context.
    fn now(&self) -> Instant;

    /// Sleep for the given duration. Driver-only; protocol logic must go
    /// through deadlines computed from [`Environment::now`].
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fill the buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// One random byte, used to randomize the first sequence number so
    /// restarts do not collide with responses to a previous run.
    fn random_u8(&self) -> u8 {
        let mut byte = [0u8; 1];
        self.random_bytes(&mut byte);
        byte[0]
    }
}

/// Production environment: system clock, tokio timers, thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        rand::thread_rng().fill_bytes(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_flows() {
        let env = SystemEnv;
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        env.random_bytes(&mut first);
        env.random_bytes(&mut second);
        assert_ne!(first, second);
    }
}
