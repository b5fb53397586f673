pub(crate) mod call;
mod routes;
mod util;
pub use routes::main_route;
