pub mod model;
pub mod password;
