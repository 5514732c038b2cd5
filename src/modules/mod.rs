//! Command modules
//!
//! - toolkit: one function per subcommand, returning printable rows

pub mod toolkit;
