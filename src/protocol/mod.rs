pub mod meta;
pub mod request;
pub mod response;

pub use meta::PluginMeta;
pub use request::{InvokeParams, Method, Request};
pub use response::{Response, ResponseError};
