//! Graph data providers: the only boundary the analyses depend on

mod http;
mod memory;
mod traits;

pub use http::LogseqClient;
pub use memory::MemoryProvider;
pub use traits::{GraphProvider, Placement, ProviderError, ProviderResult};
