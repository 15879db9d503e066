//! Entry point for the `murick` binary. Setup lives in the library so the
//! integration tests can drive the same code path.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    murick_cli::run().await
}
