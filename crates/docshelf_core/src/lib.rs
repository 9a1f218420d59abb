pub mod artifact;
pub mod error;
pub mod media;
pub mod publish;
pub mod traits;

pub mod prelude {
    pub use super::artifact::*;
    pub use super::error::*;
    pub use super::media::*;
    pub use super::publish::*;
    pub use super::traits::*;
}
