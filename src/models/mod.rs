mod content;
mod research;

pub use content::*;
pub use research::*;
