mod api;
mod pages;

pub mod auth;
pub mod fetch;
pub mod ingest;
pub mod server;
pub mod state;

pub mod prelude {
    pub use crate::auth::*;
    pub use crate::fetch::*;
    pub use crate::ingest::*;
    pub use crate::server::*;
    pub use crate::state::*;
}
