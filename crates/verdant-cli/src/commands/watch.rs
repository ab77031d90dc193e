use std::path::Path;

use verdant_core::PollController;

pub fn run(
    endpoint: Option<String>,
    mock: bool,
    interval_ms: u64,
    capacity: usize,
    rules_path: Option<&Path>,
) {
    let rules = super::load_rules(rules_path);
    let config = super::build_config(endpoint, mock, interval_ms);
    let controller = PollController::new(config, rules, capacity);

    let mut app = crate::tui::app::App::new(controller);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
