mod sources;

pub use sources::VecSource;
