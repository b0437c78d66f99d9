pub mod designation;
pub mod file;
pub mod lookup;
pub mod plan;
pub mod profile;
pub mod skill;
pub mod user;

pub use designation::*;
pub use file::*;
pub use lookup::*;
pub use plan::*;
pub use profile::*;
pub use skill::*;
pub use user::*;
