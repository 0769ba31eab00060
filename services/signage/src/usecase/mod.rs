pub mod account;
pub mod activity;
pub mod branding;
pub mod command;
pub mod pairing;
pub mod rates;
pub mod session;
pub mod snapshot;
pub mod unit;
pub mod video;
