pub mod api;
pub mod histogram;
pub mod provider;
pub mod request;
pub mod series;
pub mod state;
