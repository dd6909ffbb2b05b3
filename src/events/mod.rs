pub mod controls;
pub mod pointer;

pub use controls::wire_depth_control;
pub use pointer::wire_pointermove;
