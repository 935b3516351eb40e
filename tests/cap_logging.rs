//! The population cap surfaces only as an error value; nothing is logged at
//! warn or above on the way out.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use frogsim::engine::ProgressSink;
use frogsim::{SimConfig, Simulation, SimulationError};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct RecordingLogger;

impl Log for RecordingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger;

struct QuietSink;

impl ProgressSink for QuietSink {
    fn line(&self, _line: &str) {}
}

#[tokio::test]
async fn test_population_cap_logs_nothing_loud() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let config = SimConfig {
        initial_frogs: 120,
        initial_infected: 0,
        years: 1,
        year_interval: Duration::from_secs(60),
        ..Default::default()
    };
    let simulation = Simulation::new(config)
        .unwrap()
        .with_sink(Arc::new(QuietSink));

    let result = tokio::time::timeout(Duration::from_secs(30), simulation.run())
        .await
        .unwrap();
    assert!(matches!(
        result,
        Err(SimulationError::PopulationCap { cap: 100, .. })
    ));

    let records = RECORDS.lock().unwrap();
    assert!(records.iter().any(|(_, message)| message.contains("population cap")));
    let loud: Vec<_> = records
        .iter()
        .filter(|(level, _)| *level <= Level::Warn)
        .collect();
    assert!(loud.is_empty(), "unexpected warnings: {:?}", loud);
}
