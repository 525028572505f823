pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskQuery, TaskUpdate};
pub use user::User;
