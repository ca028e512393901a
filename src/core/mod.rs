pub mod convert;
pub mod csv_io;
pub mod delivery;
pub mod etl;
pub mod filter;
pub mod lookup;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod transform;

pub use crate::domain::model::{InputRow, OutputRecord, OutputSchema, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
