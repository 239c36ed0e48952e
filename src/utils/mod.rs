pub mod error;
pub mod logging;
pub mod names;

pub use error::{InvocationError, Result, SbieError};
pub use names::validate_box_name;
