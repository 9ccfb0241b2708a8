pub mod acl;
pub mod documents;
pub mod events;
pub mod tags;
pub mod users;
pub mod utils;
