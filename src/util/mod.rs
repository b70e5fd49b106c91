mod side;
mod timers;

pub use side::*;
pub use timers::*;
