pub mod capability;
pub mod grant;
pub mod memfs;
pub mod realfs;
pub mod resolve;
pub mod watcher;
pub mod writer;
