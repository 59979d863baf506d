use anyhow::Result;
use serde_json::json;
use tokio::time::{sleep, Duration};

use tradepro::academy::{Academy, Session};
use tradepro::config::{ts_epoch_ms, Config};
use tradepro::logging::{log, obj, v_num, v_str, Domain, Level};
use tradepro::market::{self, seed_quotes, MarketSim};
use tradepro::orders::{mark_to_market, place_order, OrderSide};
use tradepro::store::SessionStore;

/// Scripted end-to-end session: restore or sign up, pass the assessment, buy
/// a course, activate trading, then ride the feed for a few ticks and place
/// one round trip. Exercises every screen the way a user would.
#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("config_hash", v_str(&cfg.config_hash())),
            ("store_path", v_str(&cfg.store_path)),
        ]),
    );

    let mut store = SessionStore::new(&cfg.store_path)?;
    store.init()?;
    log(
        Level::Debug,
        Domain::Store,
        "opened",
        obj(&[("path", v_str(&cfg.store_path))]),
    );

    let academy = Academy::new(cfg.clone());
    let mut session = match store.load_user()? {
        Some(user) => {
            log(
                Level::Info,
                Domain::Session,
                "restored",
                obj(&[
                    ("user_id", v_str(&user.id)),
                    ("email", v_str(&user.email)),
                    ("attempts", v_num(user.test_attempts as f64)),
                ]),
            );
            Session::resume(academy, user)
        }
        None => {
            let mut session = Session::new(academy);
            let user = session.sign_up("demo@tradepro.test", "Demo Trader")?;
            log(
                Level::Info,
                Domain::Session,
                "signed_up",
                obj(&[("user_id", v_str(&user.id)), ("email", v_str(&user.email))]),
            );
            store.save_user(user)?;
            session
        }
    };

    if !session.user().map(|u| u.has_passed).unwrap_or(false) {
        // The fee is presentational; it never touches the record.
        log(
            Level::Info,
            Domain::Assessment,
            "fee_collected",
            obj(&[("amount", v_num(cfg.assessment_fee))]),
        );
        let mut sitting = session.academy().start_assessment(ts_epoch_ms());
        let correct: Vec<usize> = session.academy().questions().iter().map(|q| q.correct).collect();
        for (idx, choice) in correct.into_iter().enumerate() {
            sitting.record_answer(idx, choice, ts_epoch_ms())?;
        }
        let answers = sitting.answers().to_vec();
        let outcome = session.submit_assessment(&answers)?;
        log(
            Level::Info,
            Domain::Assessment,
            "graded",
            obj(&[
                ("correct", v_num(outcome.correct as f64)),
                ("total", v_num(outcome.total as f64)),
                ("threshold", v_num(outcome.threshold as f64)),
                ("passed", json!(outcome.passed)),
            ]),
        );
        if let Some(user) = session.user() {
            store.save_user(user)?;
        }
    }

    // Buy the first course not yet completed, if any remain.
    let next_course = session.user().and_then(|user| {
        session
            .academy()
            .courses()
            .iter()
            .find(|c| !user.courses_completed.contains(&c.title))
            .map(|c| c.id.clone())
    });
    if let Some(course_id) = next_course {
        let pending = session.begin_purchase(&course_id, ts_epoch_ms())?;
        log(
            Level::Info,
            Domain::Course,
            "purchase_started",
            obj(&[
                ("course_id", v_str(&pending.course_id)),
                ("title", v_str(&pending.title)),
                ("price", v_num(pending.price)),
            ]),
        );
        sleep(Duration::from_millis(cfg.purchase_settle_ms)).await;
        let user = session.settle_purchase(ts_epoch_ms())?;
        log(
            Level::Info,
            Domain::Course,
            "purchase_settled",
            obj(&[
                ("user_id", v_str(&user.id)),
                ("completed", v_num(user.courses_completed.len() as f64)),
            ]),
        );
        store.save_user(user)?;
    }

    let user = session.activate_trading()?;
    log(
        Level::Info,
        Domain::Session,
        "trading_activated",
        obj(&[
            ("user_id", v_str(&user.id)),
            ("balance", v_num(user.portfolio.balance)),
        ]),
    );
    store.save_user(user)?;

    let sim = MarketSim::new(seed_quotes(), cfg.price_jitter);
    let feed = market::spawn_feed(sim, Duration::from_millis(cfg.tick_ms));
    let mut rx = feed.subscribe();

    for tick in 0..3u32 {
        rx.changed().await?;
        let quotes = rx.borrow_and_update().clone();

        if let Some(user) = session.user_mut() {
            if tick == 0 {
                let aapl = quotes
                    .iter()
                    .find(|q| q.symbol == "AAPL")
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("AAPL missing from snapshot"))?;
                if let Err(err) = place_order(&mut user.portfolio, &aapl, OrderSide::Buy, 5) {
                    log(
                        Level::Warn,
                        Domain::Order,
                        "rejected",
                        obj(&[("symbol", v_str("AAPL")), ("msg", v_str(&err.to_string()))]),
                    );
                } else {
                    log(
                        Level::Info,
                        Domain::Order,
                        "filled",
                        obj(&[
                            ("symbol", v_str("AAPL")),
                            ("side", v_str(OrderSide::Buy.as_str())),
                            ("qty", v_num(5.0)),
                            ("price", v_num(aapl.price)),
                        ]),
                    );
                }
            }

            mark_to_market(&mut user.portfolio, &quotes);
            log(
                Level::Info,
                Domain::Market,
                "valuation",
                obj(&[
                    ("total_value", v_num(user.portfolio.total_value)),
                    ("profit_loss", v_num(user.portfolio.profit_loss)),
                ]),
            );
        }
        if let Some(user) = session.user() {
            store.save_user(user)?;
        }
    }

    // Close the round trip at the latest price before shutting down.
    if let Some(user) = session.user_mut() {
        let quotes = rx.borrow().clone();
        if let Some(aapl) = quotes.iter().find(|q| q.symbol == "AAPL") {
            let held = user.portfolio.held_quantity("AAPL");
            if held > 0 {
                place_order(&mut user.portfolio, aapl, OrderSide::Sell, held)?;
                log(
                    Level::Info,
                    Domain::Order,
                    "filled",
                    obj(&[
                        ("symbol", v_str("AAPL")),
                        ("side", v_str(OrderSide::Sell.as_str())),
                        ("qty", v_num(held as f64)),
                        ("price", v_num(aapl.price)),
                    ]),
                );
            }
        }
    }
    if let Some(user) = session.user() {
        store.save_user(user)?;
    }

    feed.stop();

    // LOGOUT=1 clears the persisted record instead of carrying it forward.
    if std::env::var("LOGOUT").as_deref() == Ok("1") {
        session.logout();
        store.clear_user()?;
        log(Level::Info, Domain::Session, "logged_out", obj(&[]));
    }

    log(
        Level::Info,
        Domain::System,
        "shutdown",
        obj(&[("msg", v_str("session complete"))]),
    );
    Ok(())
}
