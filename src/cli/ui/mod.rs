mod output;

pub use output::{Output, header, mode_badge, section};
