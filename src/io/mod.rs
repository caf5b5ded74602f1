pub use scenario_reader::{RouterSettings, Scenario};

pub mod report_writer;
pub mod sample;
pub mod scenario_reader;

/// Loads a scenario TOML; the CSV files it names are resolved relative to
/// its directory.
pub fn load_instance(path: impl Into<String>) -> anyhow::Result<Scenario> {
    scenario_reader::load_instance(path)
}
