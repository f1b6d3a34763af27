pub mod notion;
pub mod supabase;

mod error;

pub use error::{Error, Result};
pub use notion::NotionClient;
pub use supabase::SupabaseClient;
