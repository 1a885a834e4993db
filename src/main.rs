use actix_web::web::Data;
use actix_web::{App, HttpServer};
use discgolf_tournaments::args;
use discgolf_tournaments::cache::MemoryCache;
use discgolf_tournaments::controller::client::HttpUpstream;
use discgolf_tournaments::routes;
use discgolf_tournaments::state::AppState;
use log::info;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::args_checks();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let upstream = HttpUpstream::new(args.upstream_timeout())?;
    let state = Data::new(AppState::new(
        Arc::new(MemoryCache::new()),
        Arc::new(upstream),
        &args,
    ));

    info!(
        "Server has started on http://{}:{} ({:?} mode)",
        args.bind_host, args.port, args.run_mode
    );

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes::configure))
        .bind((args.bind_host.as_str(), args.port))?
        .run()
        .await?;
    Ok(())
}
