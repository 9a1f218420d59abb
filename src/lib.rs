pub use docshelf_core::*;

#[cfg(feature = "server")]
pub mod server {
    pub use docshelf_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use docshelf_client::*;
}

#[cfg(feature = "fs")]
pub mod fs {
    pub use docshelf_fs::*;
}

pub mod prelude {
    pub use docshelf_core::prelude::*;

    #[cfg(feature = "server")]
    pub use docshelf_server::prelude::*;

    #[cfg(feature = "client")]
    pub use docshelf_client::DocshelfClient;

    #[cfg(feature = "fs")]
    pub use docshelf_fs::FileSystemStore;
}
