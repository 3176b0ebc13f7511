mod search;
mod status;
mod upsert;

pub use search::{DEFAULT_SEARCH_LIMIT, SearchArgs};
pub use upsert::UpsertArgs;

pub use search::handle_search;
pub use status::handle_status;
pub use upsert::handle_upsert;
