// Domain models: wire types from the CMDB backend plus derived view records.

mod aggregate;
mod inventory;
mod resource;
mod snapshot;

pub use aggregate::{ClusterAggregate, IdcUsage};
pub use inventory::{HostApplication, HostPool};
pub use resource::{ClusterGroup, ServerResource};
pub use snapshot::Snapshot;
