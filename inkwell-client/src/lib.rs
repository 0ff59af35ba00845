//! Client library for the Inkwell HTTP API.
//!
//! [`InkwellClient`] wraps every public endpoint over `reqwest`. It keeps no
//! login state: `signup`/`login` return an [`AuthResponse`] whose
//! [`AuthResponse::session`] is passed to calls that need a caller.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{InkwellClientError, InkwellClientResult};
pub use http_client::InkwellClient;
pub use models::{
    AuthResponse, Author, Comment, FeedPost, NewPost, Post, PostDetail, PostUpdate, ProfileUpdate,
    PublicProfile, Session, SignupRequest, User,
};
