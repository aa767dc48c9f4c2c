//! CLI command implementations.

pub mod config;
pub mod format;
pub mod import;
pub mod init;
pub mod post;
pub mod serve;
pub mod submissions;

pub use config::get_value;
pub use format::format_file;
pub use import::import_posts;
pub use init::init_project;
pub use post::{
    edit_post, list_posts, new_post, set_published, show_post, EditPostArgs, NewPostArgs,
};
pub use serve::serve;
pub use submissions::{list_submissions, mark_processed};
