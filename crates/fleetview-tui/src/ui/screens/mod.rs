//! Screen implementations

mod fleet_overview;
mod pool_detail;

pub use fleet_overview::FleetOverviewScreen;
pub use pool_detail::PoolDetailScreen;
