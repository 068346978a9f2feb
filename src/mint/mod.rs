pub mod errors;
pub mod instructions;
pub mod poll;
pub mod process;
pub mod session;

pub use errors::*;
pub use instructions::*;
pub use poll::*;
pub use process::*;
pub use session::*;
