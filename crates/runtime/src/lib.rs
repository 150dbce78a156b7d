pub mod slots;
pub mod timer;
pub mod virtual_timers;

pub use slots::*;
pub use timer::*;
pub use virtual_timers::*;
