pub mod args;
pub mod cache;
pub mod error;
pub mod model;
pub mod routes;
pub mod state;
pub mod controller {
    pub mod cache;
    pub mod client;
    pub mod dedup;
    pub mod metrix;
    pub mod official;
    pub mod proxy;
    pub mod tournaments;
}

pub use controller::cache::Orchestrator;
pub use error::AppError;
pub use model::TournamentRecord;
