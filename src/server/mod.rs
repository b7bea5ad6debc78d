pub mod server;
pub mod state;

pub use server::{make_app, run_server};
pub use state::{ServerConfig, ServerState};
