pub mod compare;
pub mod model;
pub mod msg;
pub mod settings;
mod store;

pub use store::AppStore;
