mod materialize;
mod rewrite;
mod substitute;

pub use materialize::{Header, Template, materialize};
pub use rewrite::shift_placeholders;
pub use substitute::bind_url;
