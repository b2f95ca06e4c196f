mod errors;
mod processor;
mod ranking;
mod registry;
mod session;
mod traits;
mod types;
mod url_sniffer;

pub use errors::*;
pub use processor::ResolutionStep;
pub use ranking::{rank_formats, score_format};
pub use registry::*;
pub use session::*;
pub use traits::*;
pub use types::*;
pub use url_sniffer::{extract_url, NotAUrl};
