pub mod tcmb;
pub mod util;
