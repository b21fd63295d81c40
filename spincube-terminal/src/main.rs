/// Spincube Terminal - rotating cube in the terminal
///
/// Usage: spincube-terminal [raw|scene]
///
///   raw    fixed buffers and a single indexed draw (default)
///   scene  scene graph with a spinning cube entity
///
/// Press Q or ESC to quit.
use spincube_terminal::{init_logging, LoggingConfig, Program, TerminalApp, TerminalConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let program = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Program>()?,
        None => Program::default(),
    };

    let mut app = TerminalApp::new(TerminalConfig {
        program,
        ..TerminalConfig::default()
    })?;
    app.run()
}
