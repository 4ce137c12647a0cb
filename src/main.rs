use std::future;
use std::io;
use std::sync::Arc;

use app::App;
use joke_fetcher::JokeFetcher;
use tokio::signal;
use utilities::config::Config;

mod apis;
mod app;
mod joke_fetcher;
mod logchamp;
mod screen;
mod utilities;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = logchamp::init() {
        eprintln!("logging unavailable: {err}");
    }
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => log::warn!("failed to load .env: {err}"),
        _ => (),
    }

    let config = Config::from_env();
    let http_client = match config.http_client() {
        Ok(http_client) => http_client,
        Err(err) => {
            log::error!("failed to build the HTTP client: {err}");
            return;
        }
    };

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => log::warn!("Ctrl+C received"),
            Err(err) => {
                log::error!("cannot listen for Ctrl+C: {err}");
                future::pending::<()>().await;
            }
        }
    };

    let mut app = App::new(Arc::new(JokeFetcher::new(http_client)));
    if let Err(err) = app.run(app::stdin_lines(), shutdown, &mut io::stdout()).await {
        log::error!("terminal I/O failed: {err}");
    }

    log::logger().flush();
}
