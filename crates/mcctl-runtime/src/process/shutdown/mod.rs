//! Child process termination.

mod child;

pub use child::{DEFAULT_TERM_GRACE, reap_or_shutdown, shutdown_child};
