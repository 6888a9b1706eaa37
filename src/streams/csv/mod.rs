mod example_reader;
mod frame_source;
mod parser;

pub use example_reader::read_examples;
pub use frame_source::CsvFrameSource;
