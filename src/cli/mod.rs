//! Command implementations, one module per subcommand

pub mod extract;
pub mod split;
pub mod titles;
pub mod truncate;
