pub mod commit;
pub mod gallery;
pub mod media;
pub mod model;
pub mod previews;
pub mod remote;
pub mod store;
