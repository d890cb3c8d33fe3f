mod category;
mod folder;
mod media;
mod tag;
mod unified;

pub use category::*;
pub use folder::*;
pub use media::*;
pub use tag::*;
pub use unified::*;
