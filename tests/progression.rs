//! End-to-end progression: signup through assessment, course purchase,
//! trading activation, a round-trip order, and a persistence round trip.

use tempfile::TempDir;
use tokio::time::Duration;

use tradepro::academy::{Academy, Session};
use tradepro::config::Config;
use tradepro::error::AcademyError;
use tradepro::market::{seed_quotes, spawn_feed, MarketSim};
use tradepro::orders::{mark_to_market, place_order, OrderSide};
use tradepro::store::SessionStore;

fn test_config() -> Config {
    let mut cfg = Config::from_env();
    cfg.purchase_settle_ms = 50;
    cfg
}

fn passing_answers(academy: &Academy) -> Vec<Option<usize>> {
    academy.questions().iter().map(|q| Some(q.correct)).collect()
}

#[test]
fn full_progression_signup_to_trading() {
    let cfg = test_config();
    let mut session = Session::new(Academy::new(cfg.clone()));

    let user = session.sign_up("learner@example.com", "Learner").unwrap();
    assert!(!user.has_passed);
    assert_eq!(user.credits, 0);

    // Trading is locked until the assessment is passed.
    assert!(matches!(
        session.activate_trading(),
        Err(AcademyError::InvalidState(_))
    ));

    // First sitting fails, second passes.
    let blank = vec![None; 5];
    let outcome = session.submit_assessment(&blank).unwrap();
    assert!(!outcome.passed);

    let answers = passing_answers(session.academy());
    let outcome = session.submit_assessment(&answers).unwrap();
    assert!(outcome.passed);
    let user = session.user().unwrap();
    assert_eq!(user.test_attempts, 2);
    assert_eq!(user.credits, 10_000);

    // Course purchase settles after its processing window.
    session.begin_purchase("basics", 0).unwrap();
    let settle_at = session.pending_purchase().unwrap().settle_at_ms;
    let user = session.settle_purchase(settle_at).unwrap();
    assert_eq!(user.courses_completed, vec!["Trading Fundamentals".to_string()]);

    // Activation funds the portfolio once.
    let user = session.activate_trading().unwrap();
    assert!(user.trading_active);
    assert!((user.portfolio.balance - cfg.starting_balance).abs() < 1e-9);

    // A buy and a full close return the balance to where valuation says.
    let quotes = seed_quotes();
    let aapl = quotes.iter().find(|q| q.symbol == "AAPL").unwrap().clone();
    let user = session.user_mut().unwrap();
    place_order(&mut user.portfolio, &aapl, OrderSide::Buy, 10).unwrap();
    assert_eq!(user.portfolio.held_quantity("AAPL"), 10);
    mark_to_market(&mut user.portfolio, &quotes);
    assert!((user.portfolio.total_value - cfg.starting_balance).abs() < 1e-6);

    place_order(&mut user.portfolio, &aapl, OrderSide::Sell, 10).unwrap();
    assert!(user.portfolio.positions.is_empty());
    assert!((user.portfolio.balance - cfg.starting_balance).abs() < 1e-6);
}

#[test]
fn persisted_record_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("academy.sqlite");
    let path = path.to_str().unwrap();
    let cfg = test_config();

    {
        let mut store = SessionStore::new(path).unwrap();
        store.init().unwrap();
        let mut session = Session::new(Academy::new(cfg.clone()));
        session.sign_up("learner@example.com", "Learner").unwrap();
        let answers = passing_answers(session.academy());
        session.submit_assessment(&answers).unwrap();
        session.activate_trading().unwrap();
        store.save_user(session.user().unwrap()).unwrap();
    }

    // A fresh process sees the same record and may continue from it.
    let mut store = SessionStore::new(path).unwrap();
    store.init().unwrap();
    let user = store.load_user().unwrap().expect("record should persist");
    assert!(user.has_passed);
    assert!(user.trading_active);
    assert_eq!(user.credits, 10_000);

    let mut session = Session::resume(Academy::new(cfg), user);
    let answers = passing_answers(session.academy());
    let outcome = session.submit_assessment(&answers).unwrap();
    assert!(outcome.passed);
    assert_eq!(session.user().unwrap().test_attempts, 2);

    // Logout clears the slot.
    session.logout();
    store.clear_user().unwrap();
    assert!(store.load_user().unwrap().is_none());
}

#[tokio::test]
async fn feed_drives_portfolio_valuation() {
    let cfg = test_config();
    let mut session = Session::new(Academy::new(cfg.clone()));
    session.sign_up("learner@example.com", "Learner").unwrap();
    let answers = passing_answers(session.academy());
    session.submit_assessment(&answers).unwrap();
    session.activate_trading().unwrap();

    let sim = MarketSim::with_seed(seed_quotes(), cfg.price_jitter, 11);
    let feed = spawn_feed(sim, Duration::from_millis(10));
    let mut rx = feed.subscribe();

    let first = rx.borrow_and_update().clone();
    let aapl = first.iter().find(|q| q.symbol == "AAPL").unwrap();
    let user = session.user_mut().unwrap();
    place_order(&mut user.portfolio, aapl, OrderSide::Buy, 5).unwrap();

    rx.changed().await.unwrap();
    let quotes = rx.borrow_and_update().clone();
    mark_to_market(&mut user.portfolio, &quotes);

    let pos = user.portfolio.position("AAPL").unwrap();
    let tick_price = quotes.iter().find(|q| q.symbol == "AAPL").unwrap().price;
    assert!((pos.current_price - tick_price).abs() < 1e-9);
    let expected = user.portfolio.balance + 5.0 * tick_price;
    assert!((user.portfolio.total_value - expected).abs() < 1e-9);

    feed.stop();
}
