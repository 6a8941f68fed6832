pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, dim, error, info, section, success, warn};
pub use table::{stats_table, violations_table};
pub use theme::{Theme, theme};
