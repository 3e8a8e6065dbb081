pub mod cli;
pub mod config;
pub mod display;
pub mod feed;
pub mod logging;
pub mod master;
pub mod reporting;
pub mod stat;
pub mod viewer;
