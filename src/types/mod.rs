mod attribute_value;
mod entry;
mod record;
mod shard;

pub use attribute_value::AttributeValue;
pub use entry::Entry;
pub use record::Record;
pub use shard::{Shard, Shards};
