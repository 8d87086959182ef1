mod async_task;
mod surface;
mod tool;
mod viewer;

pub use async_task::*;
pub use surface::*;
pub use tool::*;
pub use viewer::*;

pub use futures::future::BoxFuture;
