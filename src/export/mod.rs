pub mod csv;

pub use self::csv::{write_marginal_utilities_csv, write_report_csv, write_synergies_csv};
