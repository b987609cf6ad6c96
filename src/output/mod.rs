mod response;

pub use response::{emit, Summary};
