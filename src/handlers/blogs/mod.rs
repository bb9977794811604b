// Blog handlers
//
// collection.rs - GET/POST /api/blogs
// record.rs     - GET/PUT/DELETE /api/blogs/:id

pub mod collection;
pub mod record;

pub use collection::{create, list};
pub use record::{delete, get, update};
