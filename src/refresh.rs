// Repeating refresh of displayed codes: ticks at the countdown cadence,
// regenerates codes when the 30 s window changes and retries failed entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::account::Account;
use crate::clock::Clock;
use crate::counter;
use crate::keyed_hash::KeyedHashProvider;
use crate::totp::TotpGenerator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub name: String,
    pub label: String,
    // Rendered error when generation failed
    pub code: Result<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub now_ms: u64,
    pub remaining_secs: u64,
    pub entries: Vec<CodeEntry>,
}

impl Snapshot {
    pub fn counter(&self) -> u64 {
        counter::counter(self.now_ms)
    }
}

struct Refresher<C, P> {
    accounts: Vec<Account>,
    generator: TotpGenerator<P>,
    clock: C,
}

impl<C: Clock, P: KeyedHashProvider> Refresher<C, P> {
    fn snapshot(&self, previous: Option<&Snapshot>) -> Snapshot {
        let now_ms = self.clock.now_ms();
        let remaining_secs = counter::seconds_remaining(now_ms);

        let current = previous.filter(|p| p.counter() == counter::counter(now_ms));
        let entries = self
            .accounts
            .iter()
            .enumerate()
            .map(|(i, account)| {
                let cached = current.and_then(|p| p.entries.get(i));
                match cached {
                    // Only successful codes are reused within a window.
                    Some(entry) if entry.code.is_ok() => entry.clone(),
                    _ => self.generate_one(account, now_ms, cached),
                }
            })
            .collect();

        Snapshot {
            now_ms,
            remaining_secs,
            entries,
        }
    }

    fn generate_one(&self, account: &Account, now_ms: u64, cached: Option<&CodeEntry>) -> CodeEntry {
        let code = self
            .generator
            .generate(&account.secret, now_ms)
            .map_err(|err| {
                if cached.is_none_or(|entry| entry.code.is_ok()) {
                    warn!(account = %account.name, stage = %err.stage(), "code generation failed");
                }
                format!("{err}: {}", err.cause())
            });

        CodeEntry {
            name: account.name.clone(),
            label: account.label(),
            code,
        }
    }
}

/// Handle to a running refresh loop. Dropping it cancels the loop.
pub struct RefreshTask {
    handle: JoinHandle<()>,
    snapshots: watch::Receiver<Snapshot>,
}

impl RefreshTask {
    pub fn spawn<C, P>(
        accounts: Vec<Account>,
        generator: TotpGenerator<P>,
        clock: C,
        interval: Duration,
    ) -> Self
    where
        C: Clock + 'static,
        P: KeyedHashProvider + Send + 'static,
    {
        let refresher = Refresher {
            accounts,
            generator,
            clock,
        };
        let (tx, snapshots) = watch::channel(refresher.snapshot(None));

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let next = refresher.snapshot(Some(&*tx.borrow()));
                if tx.send(next).is_err() {
                    break;
                }
            }
        });

        Self { handle, snapshots }
    }

    pub fn latest(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
