//! Chart-of-accounts registry.
//!
//! Ships an embedded SKR03 subset with keyword tags for automatic account
//! assignment; alternative charts load from a `;`-delimited file.
//!
//! # Example
//!
//! ```
//! use kontierung::accounts::AccountRegistry;
//!
//! let csv = "code;name;type;category;keywords\n\
//!            4930;Bürobedarf;Aufwand;Büro;papier|toner\n\
//!            1600;Verbindlichkeiten aLuL;Passiva;Verbindlichkeiten;\n";
//! let chart = AccountRegistry::from_csv_reader(csv.as_bytes()).unwrap();
//! assert_eq!(chart.scan_by_keyword("toner")[0].code, "4930");
//! ```

mod registry;
mod skr03;

pub use registry::{Account, AccountRegistry, AccountType};
pub use skr03::{
    CATEGORY_COMMUNICATION, CATEGORY_FIXED_ASSETS, CATEGORY_GOODS, CATEGORY_MAINTENANCE,
    CATEGORY_OFFICE, CATEGORY_VEHICLES, POPULAR_CATEGORIES,
};
