pub mod change_service;
pub mod clip_service;
pub mod merge_service;
pub mod overview_service;
pub mod timeline_service;
