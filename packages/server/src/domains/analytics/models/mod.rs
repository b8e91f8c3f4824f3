pub mod view_event;

pub use view_event::*;
