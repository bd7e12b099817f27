//! Error definitions for the MPQ421x driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed.
    I2c(I2cError),
    /// Reference code wider than the 11-bit DAC.
    OutOfRange,
    /// Setting or address preset does not exist on this chip variant.
    InvalidConfig,
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::OutOfRange => write!(f, "reference code out of range"),
            Error::InvalidConfig => write!(f, "invalid configuration for this device"),
        }
    }
}
