pub mod newsapi;

pub use newsapi::ReqwestNewsClient;
