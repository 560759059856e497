pub mod browser;
pub mod directory;
pub mod extractor;
pub mod fetcher;
pub mod normalizer;
pub mod pipeline;
pub mod sink;
pub mod tasklist;

pub use browser::*;
pub use directory::*;
pub use extractor::*;
pub use fetcher::*;
pub use normalizer::*;
pub use pipeline::*;
pub use sink::*;
pub use tasklist::*;
