pub mod category;
pub mod filter;
pub mod id;
pub mod note;

pub use category::Category;
pub use filter::Filter;
pub use id::Id;
pub use note::Note;
