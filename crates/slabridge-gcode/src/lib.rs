//! G-code/M-code translation for the SLA controller protocol.
//!
//! Only a handful of codes mean anything to the controller:
//!
//! | Line  | Frame                                  |
//! |-------|----------------------------------------|
//! | G1    | `'Z'` + step count of the `Z` value    |
//! | G28   | `'S' 'H'` home                         |
//! | M600  | `'S' 'P'` begin print, offset argument |
//! | M601  | `'S' 'S'` standby                      |
//! | M602  | raw hex passthrough                    |
//!
//! Everything else is rejected as unsupported. Lines that do not start with
//! `G` or `M` are ignored outright.

pub mod error;
pub mod parser;
pub mod translate;
pub mod units;

pub use error::{ParseError, Result, TranslateError};
pub use parser::{extract_code, extract_param_value, strip_comment, CommandLetter, ParsedLine};
pub use translate::{
    status_request, Translator, TranslatorConfig, DEFAULT_PRINT_OFFSET, PASSTHROUGH_OFFSET,
};
pub use units::{to_device_steps, INCHES_PER_STEP, MM_TO_INCH};
