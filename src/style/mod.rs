mod parsed_style;

pub use parsed_style::*;
