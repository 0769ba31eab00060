mod helpers;

mod account_test;
mod notifier_test;
mod snapshot_test;
mod unit_test;
