use dsfetch_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unwritable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = cli::run() {
        eprintln!("{}", cli::error_line(&err));
        std::process::exit(1);
    }
}
