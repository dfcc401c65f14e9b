mod text;

pub use text::TextConnector;
