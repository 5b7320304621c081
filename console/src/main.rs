use anyhow::Result;
use log::{error, info};
use std::io;

use autoscuola::backend::io::Console;
use autoscuola::backend::storage::DataConnection;
use autoscuola::backend::Backend;

fn main() -> Result<()> {
    // Quiet by default so log lines do not interleave with the menu
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    info!("Starting driving school record manager");

    let connection = DataConnection::new_default()?;
    let mut backend = match Backend::open(connection) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to open school data: {:#}", e);
            return Err(e);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(&mut backend, stdin.lock(), stdout.lock());
    console.run()
}
