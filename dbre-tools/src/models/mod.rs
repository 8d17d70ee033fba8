mod identity;
mod sql_type;
mod column;
mod primary_key;
mod foreign_key;
mod index;
mod table;

pub use identity::*;
pub use sql_type::*;
pub use column::*;
pub use primary_key::*;
pub use foreign_key::*;
pub use index::*;
pub use table::*;
