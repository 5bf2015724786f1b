mod disabled_video_store;
mod local_video_store;
mod s3_video_store;
mod transfer;
mod video_store_factory;

pub use disabled_video_store::DisabledVideoStore;
pub use local_video_store::LocalVideoStore;
pub use s3_video_store::S3VideoStore;
pub use video_store_factory::VideoStoreFactory;
