mod soundcloud;

pub use soundcloud::*;
