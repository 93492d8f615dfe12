mod division;
mod event;
mod ranking;
mod splits;

pub use division::*;
pub use event::*;
pub use ranking::*;
pub use splits::*;
