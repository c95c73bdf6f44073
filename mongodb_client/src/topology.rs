mod topology_actor;
mod topology_builder;
mod topology_error;
mod topology_handle;
mod topology_helpers;

pub use topology_actor::*;
pub use topology_builder::*;
pub use topology_error::*;
pub use topology_handle::*;
pub use topology_helpers::*;
