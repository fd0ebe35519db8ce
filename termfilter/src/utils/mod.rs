pub mod config_discovery;
