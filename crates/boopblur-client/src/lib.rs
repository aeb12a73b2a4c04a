pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod records;
pub mod settings;
pub mod state;
pub mod trace;

use tracing_subscriber::{fmt, EnvFilter};

pub use error::{ClientError, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` (0, 1, 2+) picks the level.
/// Logs go to stderr so command output stays machine-readable.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "boopblur=info,boopblur_client=info,boopblur_store=warn,warn",
            1 => "boopblur=debug,boopblur_client=debug,boopblur_store=info,boopblur_shared=info,warn",
            _ => "boopblur=trace,boopblur_client=trace,boopblur_store=debug,boopblur_shared=debug,info",
        })
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
