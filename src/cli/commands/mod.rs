pub mod add;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod reset;
pub mod show;
pub mod status;
