pub use lyra_core::*;

#[cfg(feature = "seed")]
pub mod seed {
    pub use lyra_seed::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use lyra_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use lyra_client::*;
}

#[cfg(feature = "mem")]
pub mod mem {
    pub use lyra_mem::*;
}

pub mod prelude {
    pub use lyra_core::prelude::*;

    #[cfg(feature = "seed")]
    pub use lyra_seed::prelude::*;

    #[cfg(feature = "server")]
    pub use lyra_server::prelude::*;

    #[cfg(feature = "client")]
    pub use lyra_client::HttpPlatform;

    #[cfg(feature = "mem")]
    pub use lyra_mem::MemPlatform;
}
