//! Query API over HTTP

pub mod error;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use error::HttpError;
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use server::HttpServer;
