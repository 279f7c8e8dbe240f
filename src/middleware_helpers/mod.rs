pub mod request_id;
pub mod setup_guard;

pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
pub use setup_guard::setup_guard;
