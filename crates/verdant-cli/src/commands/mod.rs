pub mod rules;
pub mod sample;
pub mod serve;
pub mod watch;

use std::path::Path;
use std::time::Duration;

use verdant_core::{PollConfig, RuleTable};

/// Load the advice table, or exit with a clear message on a bad file.
pub fn load_rules(path: Option<&Path>) -> RuleTable {
    match path {
        Some(path) => match RuleTable::load(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("verdant: {e}");
                std::process::exit(2);
            }
        },
        None => RuleTable::default(),
    }
}

/// Build the poll config from CLI flags. Setting an endpoint switches to
/// live mode unless `--mock` forces the generator.
pub fn build_config(endpoint: Option<String>, mock: bool, interval_ms: u64) -> PollConfig {
    let use_mock = mock || endpoint.is_none();
    PollConfig {
        use_mock,
        endpoint_url: endpoint.unwrap_or_default(),
        poll_interval: Duration::from_millis(interval_ms.max(1)),
    }
}
