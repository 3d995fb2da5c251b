pub mod registry;
pub mod tab;

pub use registry::{RegistryError, TabRegistry};
pub use tab::{Tab, TabId, TabSnapshot, TabState, ZIndex, active_id};
