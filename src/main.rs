use std::process::ExitCode;
use std::time::Duration;

use webapp::app::{
    set_header_timeout, set_idle_timeout, set_read_timeout, set_write_timeout, Application,
};
use webapp::lifecycle::signals::shutdown_signal;

#[tokio::main]
async fn main() -> ExitCode {
    let app = Application::new([
        set_idle_timeout(Duration::from_secs(30)),
        set_read_timeout(Duration::from_secs(10)),
        set_header_timeout(Duration::from_secs(5)),
        set_write_timeout(Duration::from_secs(5)),
    ]);

    if let Err(e) = tracing::dispatcher::set_global_default(app.log().clone()) {
        eprintln!("failed to install logger: {e}");
    }

    match app.serve_with_shutdown(shutdown_signal()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
