pub mod aggregate;
pub mod cli;
pub mod ctx;
pub mod geneset;
pub mod io;
pub mod ora;
pub mod pipeline;
pub mod schema;
pub mod scorer;
pub mod stats;
pub mod summary;
