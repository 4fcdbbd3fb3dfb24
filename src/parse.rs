//! Parsers for the raw output of the git commands the resolver runs.
//!
//! None of these execute anything, they only turn text handed to them by a
//! [`CommandRunner`](crate::command::CommandRunner) into typed records. A line
//! that doesn't fit the expected shape is an [`Error`](crate::error::Error):
//! carrying on after a desync would check the wrong data.

mod rev_list;
mod show_ref;
mod tag;

pub use self::{
    rev_list::{parse_rev_list, OBJECT_END, REV_LIST_FORMAT},
    show_ref::parse_show_ref,
    tag::parse_annotated_tag,
};
