pub mod db;
pub mod http_terminal;
pub mod notifier;
