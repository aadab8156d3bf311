pub mod quantile;
pub mod ref_count;
pub mod snapshot;

pub use quantile::QuantileMap;
pub use ref_count::{RefCountMap, RefCountStrategy};
pub use snapshot::{BucketSnapshot, MapSnapshot};
