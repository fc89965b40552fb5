mod leads;
mod stream;

pub use leads::lead_routes;
pub use stream::stream_routes;
