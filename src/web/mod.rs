//! HTTP surface: index page, MJPEG streams, snapshots and status

mod handlers;
mod index;
mod routes;

pub use routes::create_router;
