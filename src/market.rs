//! Market feed simulator: a bounded random walk over a fixed instrument list.
//!
//! Each tick replaces the whole snapshot; no history is kept. The change and
//! percent-change fields are sampled independently of the price delta, as in
//! the original feed: display dressing, not derived quantities.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

fn quote(symbol: &str, name: &str, price: f64, change: f64, change_percent: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price,
        change,
        change_percent,
    }
}

/// The six instruments the trading screen opens with.
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        quote("AAPL", "Apple Inc.", 175.43, 2.15, 1.24),
        quote("GOOGL", "Alphabet Inc.", 2847.63, -15.42, -0.54),
        quote("MSFT", "Microsoft Corp.", 378.85, 5.67, 1.52),
        quote("TSLA", "Tesla Inc.", 248.92, -8.33, -3.24),
        quote("AMZN", "Amazon.com Inc.", 3342.88, 12.45, 0.37),
        quote("NVDA", "NVIDIA Corp.", 875.28, 18.92, 2.21),
    ]
}

const MIN_PRICE: f64 = 0.01;

pub struct MarketSim {
    quotes: Vec<Quote>,
    price_jitter: f64,
    rng: StdRng,
}

impl MarketSim {
    pub fn new(quotes: Vec<Quote>, price_jitter: f64) -> Self {
        Self {
            quotes,
            price_jitter,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests and replayable demos.
    pub fn with_seed(quotes: Vec<Quote>, price_jitter: f64, seed: u64) -> Self {
        Self {
            quotes,
            price_jitter,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Advance every quote one step. Prior values are discarded.
    pub fn tick(&mut self) {
        let j = self.price_jitter;
        for q in &mut self.quotes {
            q.price = (q.price + self.rng.gen_range(-j..=j)).max(MIN_PRICE);
            q.change = self.rng.gen_range(-5.0..=5.0);
            q.change_percent = self.rng.gen_range(-1.0..=1.0);
        }
    }
}

/// Handle to a running feed task. Dropping it (or calling [`FeedHandle::stop`])
/// aborts the task; a stopped feed delivers no further snapshots.
pub struct FeedHandle {
    task: JoinHandle<()>,
    rx: watch::Receiver<Vec<Quote>>,
}

impl FeedHandle {
    pub fn subscribe(&self) -> watch::Receiver<Vec<Quote>> {
        self.rx.clone()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run the simulator on a fixed interval, publishing each snapshot over a
/// watch channel. Scoped to the trading screen: the caller holds the handle
/// for the screen's lifetime and drops it on exit.
pub fn spawn_feed(mut sim: MarketSim, tick: Duration) -> FeedHandle {
    let (tx, rx) = watch::channel(sim.quotes().to_vec());
    let task = tokio::spawn(async move {
        let mut ticker = interval(tick);
        // The first interval tick completes immediately; skip it so the seed
        // snapshot stands for one full period.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sim.tick();
            if tx.send(sim.quotes().to_vec()).is_err() {
                break;
            }
        }
    });
    FeedHandle { task, rx }
}
