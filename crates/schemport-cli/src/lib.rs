pub mod display;
pub mod paths;
pub mod report;
