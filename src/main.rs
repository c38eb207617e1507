use anyhow::Result;

use vitals::commands;

fn main() -> Result<()> {
    let matches = commands::monitor::command().get_matches();
    vitals::init_logging(commands::monitor::log_file(&matches).as_deref());

    commands::monitor(&matches)
}
