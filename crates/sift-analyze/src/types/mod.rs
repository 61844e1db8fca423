mod analysis;
mod integrity;
mod profile;
mod scaffold;

pub use analysis::*;
pub use integrity::*;
pub use profile::*;
pub use scaffold::*;
