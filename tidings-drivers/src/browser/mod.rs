pub mod behavioral;
pub mod driver;
pub mod page;

pub use driver::TidingsDriver;
pub use page::{TidingsElement, TidingsPage};
