use stint_core::{Config, NullNotifier, SessionEngine, SqliteLockoutStore, SystemClock};

/// One-shot snapshot: restore the engine (which applies the load-time
/// day check, discarding a stale record) and print its read model.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = SessionEngine::restore(
        config.daily_limit_secs(),
        Box::new(SqliteLockoutStore::open()?),
        Box::new(SystemClock),
        Box::new(NullNotifier),
    )?;

    let snapshot = engine.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
