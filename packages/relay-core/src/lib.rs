pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod telemetry;

/**
 * \brief Commonly used modules and types, re-exported for the binaries.
 */
pub mod prelude {
    pub use crate::config::{
        CredentialSource, EnvCredentials, Environment, RelayConfig, StaticCredentials,
    };
    pub use crate::error::RelayError;
    pub use crate::llm::{HttpUpstream, OpenAiCompatible, ProviderAdapter, UpstreamClient};
    pub use crate::relay::{RelayOutcome, RelayResponse, TutorRelay};
    pub use crate::{server, telemetry};
}
