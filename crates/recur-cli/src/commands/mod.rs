pub mod complete;
pub mod describe;
pub mod next;
pub mod preview;
