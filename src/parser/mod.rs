mod record;
mod source;

pub use record::*;
pub use source::read_records;
