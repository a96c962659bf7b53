pub mod cli;
pub mod launch;
pub mod utils;
