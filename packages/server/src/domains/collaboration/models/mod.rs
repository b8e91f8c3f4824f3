pub mod campaign;
pub mod request;
pub mod status;

pub use campaign::*;
pub use request::*;
pub use status::*;
