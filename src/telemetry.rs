use std::io::Write;

use chrono::Local;
use env_logger::Env;

/// `<timestamp> [LEVEL] - message`, level from `RUST_LOG` (default info).
pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
