pub mod block;
pub mod view;


pub use block::*;
pub use view::*;
