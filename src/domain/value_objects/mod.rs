mod data_source;
mod page_info;
mod season;

pub use data_source::{DataSource, DataSourceInfo, DataSourceMode, Routed};
pub use page_info::{PageInfo, RawPage};
pub use season::Season;
