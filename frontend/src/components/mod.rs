pub mod capture;
pub mod results;
pub mod utils;
