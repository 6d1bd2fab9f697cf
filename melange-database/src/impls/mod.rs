pub mod badges;
pub mod probe;
pub mod profiles;
pub mod stats;
