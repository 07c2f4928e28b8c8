//! # ttt-calendar
//!
//! Pure date arithmetic for the 365-slot reference year used by every
//! climatology in the TTT pipeline.
//!
//! Real Gregorian dates (`chrono::NaiveDate`) are folded onto a non-leap
//! reference year: each (month, day) keeps its ordinal position and Feb 29
//! shares the slot of Mar 1.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use ttt_calendar::{Doy, Season, slot};
//!
//! let leap = NaiveDate::from_ymd_opt(2004, 2, 29).unwrap();
//! let march = NaiveDate::from_ymd_opt(2004, 3, 1).unwrap();
//! assert_eq!(slot(&leap), slot(&march));
//! assert_eq!(Doy::fold(&march).get(), 60);
//!
//! assert!(Season::austral_summer().contains(&march));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Day-of-year newtype and leap-day folding |
//! | `season` | Month-set season windows |
//! | `error` | Error types |

mod doy;
mod error;
mod season;

pub use doy::{Doy, N_SLOTS, slot};
pub use error::CalendarError;
pub use season::Season;
