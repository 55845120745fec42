use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use spending_tracker::{CommonPasswords, LoginPolicy, Session, Shell, StoreError, UserStore};

/// Track your purchases and spending from the command line
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The JSON file all users and purchases are stored in
    #[clap(long, env = "SPENDING_TRACKER_DATA", default_value = "user_data.json")]
    data_file: std::path::PathBuf,
    /// A newline delimited list of passwords that are too common to be used
    #[clap(
        long,
        env = "SPENDING_TRACKER_PASSWORDS",
        default_value = "100k-most-used-passwords-NCSC.txt"
    )]
    passwords_file: std::path::PathBuf,
    /// How many passwords may be tried per login
    #[clap(long, default_value_t = 3)]
    max_login_attempts: u32,
    /// Seconds to wait after a wrong password
    #[clap(long, default_value_t = 5.)]
    retry_delay: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // a missing password list only weakens the password check
    let common_passwords = CommonPasswords::load(&args.passwords_file).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "continuing without a list of common passwords");
        CommonPasswords::default()
    });

    let store = match UserStore::load(&args.data_file) {
        Ok(store) => store,
        Err(StoreError::FileNotFound(path)) => {
            tracing::warn!(path = %path.display(), "no user data found, starting with an empty store");
            UserStore::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "starting with an empty store, saving will replace the existing data");
            UserStore::new()
        }
    };

    let retry_delay = Duration::try_from_secs_f64(args.retry_delay)
        .map_err(|e| anyhow::anyhow!("invalid retry delay {}: {e}", args.retry_delay))?;
    let session = Session::new(LoginPolicy {
        max_attempts: args.max_login_attempts,
        retry_delay,
    });

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Shell::new(stdin.lock(), stdout.lock(), args.data_file)
        .with_store(store)
        .with_session(session)
        .with_common_passwords(common_passwords)
        .run()?;

    Ok(())
}
