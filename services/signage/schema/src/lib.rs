//! sea-orm entities owned by the signage service.

pub mod activity_logs;
pub mod deposit_rates;
pub mod forex_rates;
pub mod identities;
pub mod unit_configs;
pub mod video_displays;
pub mod video_sources;
