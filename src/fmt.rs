use std::io;

use crate::{config::Config, error::Result, report::YaccError};

/// Shown above the errors unless `errorMessageHeader` is set
pub const DEFAULT_HEADER: &str = concat!(
    "\n",
    r"  (c).-.(c)    (c).-.(c)    (c).-.(c)    (c).-.(c)    (c).-.(c)", "\n",
    r"   / ._. \      / ._. \      / ._. \      / ._. \      / ._. \", "\n",
    r" __\( Y )/__  __\( Y )/__  __\( Y )/__  __\( Y )/__  __\( Y )/__", "\n",
    r"(_.-/'-'\-._)(_.-/'-'\-._)(_.-/'-'\-._)(_.-/'-'\-._)(_.-/'-'\-._)", "\n",
    r"   || E ||      || R ||      || R ||      || O ||      || R ||", "\n",
    r" _.' `-' '._  _.' `-' '._  _.' `-' '._  _.' `-' '._  _.' `-' '._", "\n",
    r"(.-./`-'\.-.)(.-./`-'\.-.)(.-./`-'\.-.)(.-./`-'\.-.)(.-./`-'\.-.)", "\n",
    r" `-'     `-'  `-'     `-'  `-'     `-'  `-'     `-'  `-'     `-'", "\n",
    "\n\nPush rejected."
);

/// Wraps a `std::io::Write` object to write the text shown to a user whose
/// push was rejected.
///
/// # Example
///
/// ```
/// # use yacc::{Config, ErrorType, YaccError, fmt::ErrorMessageWriter};
/// let config = Config::from_settings([("errorMessageHeader", "Rejected")]).unwrap();
/// let errors = vec![YaccError::new(ErrorType::CommitRegex, "refs/heads/master: bad message")];
///
/// let mut out = Vec::new();
/// ErrorMessageWriter::new(&mut out).write_message(&config, &errors).unwrap();
///
/// assert_eq!("Rejected\n\nrefs/heads/master: bad message\n", String::from_utf8(out).unwrap());
/// ```
pub struct ErrorMessageWriter<'a>(&'a mut dyn io::Write);

impl<'a> ErrorMessageWriter<'a> {
    /// Creates a new instance of the `ErrorMessageWriter` struct using a
    /// `std::io::Write` object.
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> ErrorMessageWriter<'a> {
        ErrorMessageWriter(writer)
    }

    fn write_header(&mut self, config: &Config) -> Result<()> {
        let header = if config.error_message_header.is_empty() {
            DEFAULT_HEADER
        } else {
            config.error_message_header.as_str()
        };

        writeln!(self.0, "{header}").map_err(Into::into)
    }

    /// Writes one error and, when one is configured for its type, the extra
    /// text indented below it
    fn write_error(&mut self, config: &Config, error: &YaccError) -> Result<()> {
        write!(self.0, "\n{}", error.message)?;

        if let Some(extra) = config.error_message_for(error.error_type) {
            write!(self.0, "\n\n    {extra}")?;
        }

        writeln!(self.0).map_err(Into::into)
    }

    fn write_footer(&mut self, config: &Config) -> Result<()> {
        if config.error_message_footer.is_empty() {
            return Ok(());
        }

        writeln!(self.0, "\n{}", config.error_message_footer).map_err(Into::into)
    }

    /// Writes the header, every error in order and the footer
    pub fn write_message(&mut self, config: &Config, errors: &[YaccError]) -> Result<()> {
        self.write_header(config)?;

        for error in errors {
            self.write_error(config, error)?;
        }

        self.write_footer(config)?;
        self.0.flush().map_err(Into::into)
    }
}

/// Renders `errors` into a single rejection message.
pub fn error_message(config: &Config, errors: &[YaccError]) -> Result<String> {
    let mut out = Vec::new();
    ErrorMessageWriter::new(&mut out).write_message(config, errors)?;

    Ok(String::from_utf8_lossy(&out).into_owned())
}
